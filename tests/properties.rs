use frame_prep::{
    BinOptions, BinScale, Column, ColumnData, Dataset, ExpandOptions, bin, compute_bin_edges,
    dedup_edges, full_expand, generate_labels, one_hot_expand,
};
use proptest::prelude::*;

fn category_labels(dataset: &Dataset, field: &str) -> Vec<Option<String>> {
    match &dataset.column(field).expect("column").data {
        ColumnData::Categorical(cat) => cat.labels().map(|l| l.map(str::to_string)).collect(),
        other => panic!("expected categorical, got {other:?}"),
    }
}

fn indicator_values(dataset: &Dataset, name: &str) -> Vec<i64> {
    match &dataset.column(name).expect("indicator").data {
        ColumnData::Integer(values) => values.iter().map(|v| v.unwrap_or(-1)).collect(),
        other => panic!("expected integer indicator, got {other:?}"),
    }
}

#[test]
fn explicit_edges_example_assigns_last_value_to_last_bin() {
    let mut dataset = Dataset::from_columns(vec![Column::integer(
        "x",
        vec![Some(10), Some(20), Some(30), Some(40)],
    )])
    .expect("dataset");
    let labels = vec!["Low".to_string(), "Mid".to_string(), "High".to_string()];
    let options = BinOptions::default().with_edges(vec![0.0, 15.0, 25.0, 100.0]);
    let spec = bin(&mut dataset, "x", "x_bin", &labels, &options).expect("bin");
    assert_eq!(spec.edges, vec![0.0, 15.0, 25.0, 40.0]);
    assert_eq!(
        category_labels(&dataset, "x_bin"),
        vec![
            Some("Low".to_string()),
            Some("Mid".to_string()),
            Some("High".to_string()),
            Some("High".to_string()),
        ]
    );
}

#[test]
fn generated_labels_stop_at_capacity() {
    assert_eq!(generate_labels(52).expect("52 labels").len(), 52);
    assert!(generate_labels(53).is_err());
}

proptest! {
    #[test]
    fn dedup_edges_is_idempotent_and_unique(
        edges in proptest::collection::vec(-50i32..50, 0..30)
    ) {
        let edges = edges.into_iter().map(f64::from).collect::<Vec<_>>();
        let once = dedup_edges(&edges);
        prop_assert_eq!(dedup_edges(&once), once.clone());
        for (idx, edge) in once.iter().enumerate() {
            prop_assert!(!once[idx + 1..].contains(edge));
            prop_assert!(edges.contains(edge));
        }
    }

    #[test]
    fn linear_edges_span_min_to_max(
        values in proptest::collection::vec(-10_000i64..10_000, 1..60),
        label_count in 1usize..12
    ) {
        let column = Column::integer("v", values.iter().copied().map(Some).collect());
        let edges = compute_bin_edges(&column, label_count, BinScale::Linear, None)
            .expect("linear edges");
        let min = *values.iter().min().unwrap() as f64;
        let max = *values.iter().max().unwrap() as f64;
        prop_assert_eq!(edges.len(), label_count + 1);
        prop_assert_eq!(edges[0], min);
        prop_assert_eq!(edges[label_count], max);
        prop_assert!(edges.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn linear_binning_labels_every_present_value(
        values in proptest::collection::vec(proptest::option::of(-1_000i64..1_000), 2..60),
        label_count in 1usize..8
    ) {
        let present = values.iter().flatten().copied().collect::<Vec<_>>();
        prop_assume!(present.iter().min() < present.iter().max());
        let mut dataset =
            Dataset::from_columns(vec![Column::integer("v", values.clone())]).expect("dataset");
        let labels = generate_labels(label_count).expect("labels");
        let spec = bin(&mut dataset, "v", "v_bin", &labels, &BinOptions::default())
            .expect("bin");
        prop_assert_eq!(spec.labels.len(), label_count);
        let assigned = category_labels(&dataset, "v_bin");
        for (value, label) in values.iter().zip(&assigned) {
            prop_assert_eq!(value.is_some(), label.is_some());
            if let Some(label) = label {
                prop_assert!(labels.contains(label));
            }
        }
    }

    #[test]
    fn explicit_edges_yield_every_label_once_covered(
        start in -1_000i32..1_000,
        widths in proptest::collection::vec(1i32..100, 1..8),
        extra in proptest::collection::vec(0.0f64..1.0, 0..20)
    ) {
        let mut edges = vec![f64::from(start)];
        for width in &widths {
            let last = edges[edges.len() - 1];
            edges.push(last + f64::from(*width));
        }
        let (min, max) = (edges[0], edges[edges.len() - 1]);
        // Every edge is a data point, so every interval holds a value and the
        // column maximum equals the final edge.
        let mut values = edges.iter().copied().map(Some).collect::<Vec<_>>();
        values.extend(extra.iter().map(|t| Some(min + (max - min) * t)));
        let mut dataset =
            Dataset::from_columns(vec![Column::float("v", values)]).expect("dataset");
        let labels = (0..widths.len()).map(|i| format!("bin{i}")).collect::<Vec<_>>();

        let options = BinOptions::default().with_edges(edges.clone());
        let spec = bin(&mut dataset, "v", "v_bin", &labels, &options).expect("bin");
        prop_assert_eq!(&spec.edges, &edges);
        let assigned = category_labels(&dataset, "v_bin");
        prop_assert!(assigned.iter().all(Option::is_some));
        let distinct = assigned.into_iter().flatten().collect::<std::collections::BTreeSet<_>>();
        prop_assert_eq!(distinct.len(), labels.len());
    }

    #[test]
    fn indicator_rows_sum_to_one_unless_missing(
        values in proptest::collection::vec(proptest::option::of("[a-d]"), 1..40),
        sort_labels in any::<bool>()
    ) {
        let mut dataset =
            Dataset::from_columns(vec![Column::text("tag", values.clone())]).expect("dataset");
        let options = ExpandOptions::default().sort_labels(sort_labels);
        let names = one_hot_expand(&mut dataset, "tag", &options).expect("expand");
        prop_assert!(!dataset.contains("tag"));
        let distinct = values.iter().flatten().collect::<std::collections::BTreeSet<_>>();
        prop_assert_eq!(names.len(), distinct.len());
        let columns = names
            .iter()
            .map(|name| indicator_values(&dataset, name))
            .collect::<Vec<_>>();
        for (row, value) in values.iter().enumerate() {
            let sum: i64 = columns.iter().map(|column| column[row]).sum();
            prop_assert_eq!(sum, i64::from(value.is_some()));
        }
    }

    #[test]
    fn full_expand_leaves_input_untouched(
        values in proptest::collection::vec(proptest::option::of("[x-z]"), 1..20)
    ) {
        let dataset =
            Dataset::from_columns(vec![Column::text("tag", values)]).expect("dataset");
        let before = dataset.clone();
        let expanded = full_expand(&dataset, &["tag"], &ExpandOptions::default())
            .expect("full expand");
        prop_assert_eq!(&dataset, &before);
        prop_assert!(!expanded.contains("tag"));
        prop_assert_eq!(expanded.row_count(), dataset.row_count());
    }
}
