mod common;

use common::{ImageKind, quasi_flat_zones, suite_proptest_config, synthetic_image};
use morphotree_core::{Count, Image, MorphotreeBuilder, QueueStrategy};
use proptest::prelude::*;
use rstest::rstest;

fn l1(a: &u8, b: &u8) -> u8 {
    a.abs_diff(*b)
}

proptest! {
    #![proptest_config(suite_proptest_config(48))]

    #[test]
    fn cuts_match_the_quasi_flat_zones(
        kind in any::<ImageKind>(),
        rows in 1_usize..9,
        cols in 1_usize..9,
        seed in any::<u64>(),
        alpha in 0_u8..=128,
    ) {
        let image = synthetic_image(kind, rows, cols, seed);
        let runner = MorphotreeBuilder::new().build().expect("default configuration");
        let (tree, node_map) = runner.alphatree(&image, l1).expect("u8 weights");
        let labels = tree.cut_labels(alpha, &node_map).expect("valid cut");
        prop_assert_eq!(labels.into_vec(), quasi_flat_zones(&image, alpha));
    }

    #[test]
    fn trees_are_root_first_and_canonical(
        kind in any::<ImageKind>(),
        rows in 1_usize..9,
        cols in 1_usize..9,
        seed in any::<u64>(),
    ) {
        let image = synthetic_image(kind, rows, cols, seed);
        let runner = MorphotreeBuilder::new().build().expect("default configuration");
        let (tree, _) = runner.alphatree(&image, l1).expect("u8 weights");
        let values = tree.values().expect("alpha levels");
        prop_assert_eq!(tree.parent()[0], 0);
        for i in 1..tree.len() {
            prop_assert!(tree.parent()[i] < i);
            prop_assert!(values[tree.parent()[i]] > values[i]);
        }
    }

    #[test]
    fn mst_spans_every_flat_zone(
        kind in any::<ImageKind>(),
        rows in 1_usize..9,
        cols in 1_usize..9,
        seed in any::<u64>(),
    ) {
        let image = synthetic_image(kind, rows, cols, seed);
        let runner = MorphotreeBuilder::new().build().expect("default configuration");
        let (_, _, mst) = runner.alphatree_with_mst(&image, l1).expect("u8 weights");
        let zones = quasi_flat_zones(&image, 0).into_iter().max().map_or(0, |m| m + 1);
        prop_assert_eq!(mst.len(), zones - 1);
        prop_assert!(mst.windows(2).all(|pair| pair[0].w <= pair[1].w));
    }
}

#[rstest]
#[case(QueueStrategy::Buckets)]
#[case(QueueStrategy::Ordered)]
fn both_edge_containers_agree_on_the_hierarchy(#[case] strategy: QueueStrategy) {
    let image = synthetic_image(ImageKind::Noise, 12, 10, 7);
    let reference = MorphotreeBuilder::new().build().expect("default configuration");
    let runner = MorphotreeBuilder::new()
        .with_queue_strategy(strategy)
        .build()
        .expect("valid configuration");
    let (expected, expected_map) = reference.alphatree(&image, l1).expect("u8 weights");
    let (tree, node_map) = runner.alphatree(&image, l1).expect("u8 weights");
    for alpha in [0_u8, 16, 32, 64, 112] {
        assert_eq!(
            tree.cut_labels(alpha, &node_map).expect("cut"),
            expected.cut_labels(alpha, &expected_map).expect("cut"),
        );
    }
}

#[test]
fn canonicalizing_afterwards_matches_canonical_construction() {
    let image = synthetic_image(ImageKind::Blobs, 10, 10, 3);
    let canonical = MorphotreeBuilder::new().build().expect("default configuration");
    let raw = MorphotreeBuilder::new()
        .with_canonicalize(false)
        .build()
        .expect("valid configuration");
    let (expected, _) = canonical.alphatree(&image, l1).expect("u8 weights");
    let (mut tree, mut node_map) = raw.alphatree(&image, l1).expect("u8 weights");
    assert!(tree.len() >= expected.len());
    tree.canonicalize(&mut node_map).expect("node map matches");
    assert_eq!(tree.len(), expected.len());

    let before = (tree.clone(), node_map.clone());
    tree.canonicalize(&mut node_map).expect("node map matches");
    assert_eq!((tree, node_map), before);
}

#[test]
fn area_of_the_root_covers_the_image() {
    let image = synthetic_image(ImageKind::Noise, 6, 7, 11);
    let runner = MorphotreeBuilder::new().build().expect("default configuration");
    let (tree, node_map) = runner.alphatree(&image, l1).expect("u8 weights");
    let area = tree
        .compute_attribute_on_points(&node_map, Count::default(), true)
        .expect("node map matches");
    assert_eq!(area[0], 42);
    for i in 1..tree.len() {
        assert!(area[tree.parent()[i]] > area[i]);
    }
}

#[test]
fn colour_images_use_float_distances() {
    let image = Image::from_rows(vec![
        vec![[10_u8, 0, 0], [10, 0, 0], [200, 200, 200]],
        vec![[12, 1, 0], [13, 22, 16], [200, 200, 190]],
    ])
    .expect("rows");
    let euclid = |a: &[u8; 3], b: &[u8; 3]| {
        a.iter()
            .zip(b)
            .map(|(x, y)| f32::from(x.abs_diff(*y)).powi(2))
            .sum::<f32>()
            .sqrt()
    };
    let runner = MorphotreeBuilder::new().build().expect("default configuration");
    let (tree, node_map) = runner.alphatree(&image, euclid).expect("f32 weights");
    assert_eq!(
        tree.cut_labels(0.0, &node_map).expect("cut").into_vec(),
        vec![0, 0, 1, 2, 3, 4]
    );
    assert_eq!(
        tree.cut_labels(3.0, &node_map).expect("cut").into_vec(),
        vec![0, 0, 1, 0, 2, 3]
    );
    assert_eq!(
        tree.cut_labels(30.0, &node_map).expect("cut").into_vec(),
        vec![0, 0, 1, 0, 0, 1]
    );
}
