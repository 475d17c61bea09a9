use dnacom_common::BinRule;
use dnacom_render_engine::{annotate_stack, Histogram, HIGHLIGHT_RED};
use dnacom_stack_model::{Centroid, FrameStack};
use ndarray::Array3;
use proptest::prelude::*;

fn stack_and_track() -> impl Strategy<Value = (FrameStack, Vec<Centroid>)> {
    (1usize..6, 1usize..10, 1usize..10).prop_flat_map(|(n, h, w)| {
        let samples = prop::collection::vec(0.0f64..100.0, n * h * w);
        let track = prop::collection::vec((-5.0f64..15.0, -5.0f64..15.0), n);
        (samples, track).prop_map(move |(samples, track)| {
            let stack = FrameStack::new(Array3::from_shape_vec((n, h, w), samples).unwrap())
                .unwrap();
            let centroids = track.into_iter().map(|(r, c)| Centroid::new(r, c)).collect();
            (stack, centroids)
        })
    })
}

proptest! {
    #[test]
    fn annotation_keeps_shape_and_marks_one_pixel_per_frame(
        (stack, centroids) in stack_and_track()
    ) {
        let annotated = annotate_stack(&stack, &centroids, HIGHLIGHT_RED).unwrap();
        prop_assert_eq!(annotated.frame_count(), stack.frame_count());
        prop_assert_eq!(annotated.height(), stack.height());
        prop_assert_eq!(annotated.width(), stack.width());

        for (f, c) in centroids.iter().enumerate() {
            let (row, col) = c.nearest_pixel(stack.height(), stack.width());
            prop_assert_eq!(annotated.pixel(f, row, col), Some(HIGHLIGHT_RED));
        }
    }

    #[test]
    fn unmarked_pixels_are_gray(
        (stack, centroids) in stack_and_track()
    ) {
        let annotated = annotate_stack(&stack, &centroids, HIGHLIGHT_RED).unwrap();
        for (f, c) in centroids.iter().enumerate() {
            let marked = c.nearest_pixel(stack.height(), stack.width());
            for row in 0..stack.height() {
                for col in 0..stack.width() {
                    if (row, col) == marked {
                        continue;
                    }
                    let [r, g, b] = annotated.pixel(f, row, col).unwrap();
                    prop_assert!(r == g && g == b);
                }
            }
        }
    }

    #[test]
    fn histogram_counts_every_value(
        values in prop::collection::vec(-1.0e4f64..1.0e4, 1..300),
        bins in 1usize..50,
    ) {
        for rule in [BinRule::Auto, BinRule::Sturges, BinRule::Fixed { bins }] {
            let h = Histogram::from_values(&values, rule).unwrap();
            prop_assert_eq!(h.total(), values.len());
            prop_assert_eq!(h.edges.len(), h.bin_count() + 1);
            prop_assert!(h.edges.windows(2).all(|e| e[0] < e[1]));

            let (lo, hi) = h.range();
            prop_assert!(values.iter().all(|v| *v >= lo && *v <= hi));
        }
    }
}
