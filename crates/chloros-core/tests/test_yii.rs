use approx::assert_relative_eq;
use ndarray::{s, Array2, Array4};

use chloros_core::error::ChlorosError;
use chloros_core::fluor::{FluorStack, Protocol};
use chloros_core::outputs::{AnalysisContext, Datatype, ObsValue};
use chloros_core::photosynthesis::analyze_yii;

fn dark_stack(f0: f32, fm: f32, h: usize, w: usize, measurements: usize) -> FluorStack {
    let mut data = Array4::<f32>::zeros((h, w, 2, measurements));
    data.slice_mut(s![.., .., 0, ..]).fill(f0);
    data.slice_mut(s![.., .., 1, ..]).fill(fm);
    FluorStack::new(
        data,
        vec!["F0".to_string(), "Fm".to_string()],
        (0..measurements).map(|i| format!("t{i}")).collect(),
        Protocol::DarkAdapted,
    )
    .unwrap()
}

fn full_mask(h: usize, w: usize) -> Array2<u8> {
    Array2::from_elem((h, w), 255)
}

fn find_float(ctx: &AnalysisContext, variable: &str) -> f64 {
    let obs = ctx
        .outputs
        .observations
        .iter()
        .find(|o| o.variable == variable)
        .unwrap_or_else(|| panic!("no observation named {variable}"));
    match &obs.value {
        ObsValue::Float(v) => *v,
        other => panic!("expected float value for {variable}, got {other:?}"),
    }
}

#[test]
fn test_uniform_dark_stack_yields_half() {
    let stack = dark_stack(1.0, 2.0, 2, 2, 1);
    let mut ctx = AnalysisContext::default();

    let (map, fig) = analyze_yii(&stack, &full_mask(2, 2), None, "plant1", &mut ctx).unwrap();

    for v in map.data.iter() {
        assert!((v - 0.5).abs() < 1e-6, "expected 0.5, got {v}");
    }
    assert_eq!(ctx.outputs.observations.len(), 4);
    assert!((find_float(&ctx, "yii_median_t0") - 0.5).abs() < 1e-6);
    assert!((find_float(&ctx, "yii_mode_t0") - 0.5).abs() < 1e-6);
    assert!((find_float(&ctx, "yii_max_t0") - 0.5).abs() < 1e-6);
    assert_eq!(fig.label, "t0");
    assert_eq!(ctx.outputs.images.len(), 1);
}

#[test]
fn test_mask_shape_mismatch_is_fatal() {
    let stack = dark_stack(1.0, 2.0, 2, 2, 1);
    let mut ctx = AnalysisContext::default();

    let err = analyze_yii(&stack, &full_mask(3, 3), None, "plant1", &mut ctx).unwrap_err();

    assert!(matches!(err, ChlorosError::MaskShapeMismatch { .. }));
    assert!(ctx.outputs.observations.is_empty());
}

#[test]
fn test_non_binary_mask_is_fatal() {
    let stack = dark_stack(1.0, 2.0, 2, 2, 1);
    let mut mask = full_mask(2, 2);
    mask[[0, 0]] = 0;
    mask[[0, 1]] = 128;
    let mut ctx = AnalysisContext::default();

    let err = analyze_yii(&stack, &mask, None, "plant1", &mut ctx).unwrap_err();

    assert!(matches!(err, ChlorosError::NonBinaryMask(3)));
    assert!(ctx.outputs.observations.is_empty());
}

#[test]
fn test_label_count_mismatch_is_fatal() {
    let stack = dark_stack(1.0, 2.0, 2, 2, 1);
    let labels = vec!["a".to_string(), "b".to_string()];
    let mut ctx = AnalysisContext::default();

    let err = analyze_yii(&stack, &full_mask(2, 2), Some(&labels), "plant1", &mut ctx).unwrap_err();

    assert!(matches!(
        err,
        ChlorosError::LabelCountMismatch {
            expected: 1,
            actual: 2
        }
    ));
    assert!(ctx.outputs.observations.is_empty());
}

#[test]
fn test_fm_equal_f0_gives_zero_not_nan() {
    let stack = dark_stack(2.0, 2.0, 2, 2, 1);
    let mut ctx = AnalysisContext::default();

    let (map, _) = analyze_yii(&stack, &full_mask(2, 2), None, "plant1", &mut ctx).unwrap();

    for v in map.data.iter() {
        assert!(v.is_finite());
        assert_eq!(*v, 0.0);
    }
}

#[test]
fn test_masked_out_pixel_is_nan_at_every_measurement() {
    let stack = dark_stack(1.0, 2.0, 2, 2, 2);
    let mut mask = Array2::<u8>::from_elem((2, 2), 1);
    mask[[0, 0]] = 0;
    let mut ctx = AnalysisContext::default();

    let (map, _) = analyze_yii(&stack, &mask, None, "plant1", &mut ctx).unwrap();

    for mi in 0..2 {
        assert!(map.slice(mi)[[0, 0]].is_nan());
        assert!((map.slice(mi)[[1, 1]] - 0.5).abs() < 1e-6);
    }
}

#[test]
fn test_degenerate_division_is_data_not_error() {
    let stack = dark_stack(0.0, 0.0, 2, 2, 1);
    let mut ctx = AnalysisContext::default();

    let (map, _) = analyze_yii(&stack, &full_mask(2, 2), None, "plant1", &mut ctx).unwrap();

    assert!(map.data.iter().all(|v| v.is_nan()));
    assert!(find_float(&ctx, "yii_median_t0").is_nan());
    assert!(find_float(&ctx, "yii_max_t0").is_nan());
}

#[test]
fn test_lightadapted_pairs_frames_per_measurement() {
    let mut data = Array4::<f32>::zeros((1, 1, 2, 2));
    data[[0, 0, 0, 0]] = 1.0; // Fp at t0
    data[[0, 0, 1, 0]] = 4.0; // Fmp at t0
    data[[0, 0, 0, 1]] = 2.0; // Fp at t1
    data[[0, 0, 1, 1]] = 4.0; // Fmp at t1
    let stack = FluorStack::new(
        data,
        vec!["Fp".to_string(), "Fmp".to_string()],
        vec!["t0".to_string(), "t1".to_string()],
        Protocol::LightAdapted,
    )
    .unwrap();
    let mut ctx = AnalysisContext::default();

    let (map, fig) = analyze_yii(&stack, &full_mask(1, 1), None, "plant1", &mut ctx).unwrap();

    assert_relative_eq!(map.slice(0)[[0, 0]], 0.75, epsilon = 1e-6);
    assert_relative_eq!(map.slice(1)[[0, 0]], 0.5, epsilon = 1e-6);
    assert_eq!(ctx.outputs.observations.len(), 8);
    // Only the final measurement's figure comes back; the observation
    // records cover the rest.
    assert_eq!(fig.label, "t1");
}

#[test]
fn test_observation_count_and_label_override() {
    let stack = dark_stack(1.0, 2.0, 2, 2, 3);
    let labels: Vec<String> = vec!["day1".to_string(), "day2".to_string(), "day3".to_string()];
    let mut ctx = AnalysisContext::default();

    let (_, fig) =
        analyze_yii(&stack, &full_mask(2, 2), Some(&labels), "plant1", &mut ctx).unwrap();

    assert_eq!(ctx.outputs.observations.len(), 12);
    assert!(ctx
        .outputs
        .observations
        .iter()
        .any(|o| o.variable == "yii_hist_day2"));
    assert_eq!(fig.label, "day3");
}

#[test]
fn test_hist_observation_payload() {
    let stack = dark_stack(1.0, 2.0, 2, 2, 1);
    let mut ctx = AnalysisContext::default();

    analyze_yii(&stack, &full_mask(2, 2), None, "plant1", &mut ctx).unwrap();

    let obs = ctx
        .outputs
        .observations
        .iter()
        .find(|o| o.variable == "yii_hist_t0")
        .unwrap();
    assert_eq!(obs.datatype, Datatype::List);
    match (&obs.value, &obs.label) {
        (ObsValue::Counts(counts), ObsValue::Edges(edges)) => {
            assert_eq!(counts.len(), 100);
            assert_eq!(edges.len(), 100);
            assert_eq!(counts.iter().sum::<u64>(), 4);
            assert_eq!(counts[50], 4); // all four pixels at 0.5
            assert!((edges[50] - 0.5).abs() < 1e-6);
        }
        other => panic!("unexpected histogram payload: {other:?}"),
    }
}

#[test]
fn test_missing_frame_label_is_fatal() {
    // Dark-adapted protocol against a stack holding light-adapted frames.
    let data = Array4::<f32>::zeros((1, 1, 2, 1));
    let stack = FluorStack::new(
        data,
        vec!["Fp".to_string(), "Fmp".to_string()],
        vec!["t0".to_string()],
        Protocol::DarkAdapted,
    )
    .unwrap();
    let mut ctx = AnalysisContext::default();

    let err = analyze_yii(&stack, &full_mask(1, 1), None, "plant1", &mut ctx).unwrap_err();

    assert!(matches!(err, ChlorosError::FrameLabelNotFound(_)));
    assert!(ctx.outputs.observations.is_empty());
}
