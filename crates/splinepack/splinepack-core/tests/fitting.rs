use splinepack_core::{
    cubic::evaluate_nodes,
    fit::fit_samples,
    prune::prune_nodes,
    ChannelOp, ClipBuilder, CurveError, OpId, Sample, Tolerances,
};

const TOL: f32 = 0.01;
const DA_TOL: f32 = 0.00873;
const EPS: f32 = 1e-4;

/// A sine arc sampled every 4 ticks over [0, 200]; slope is the analytic
/// derivative in value-units per tick.
fn sine_samples() -> Vec<Sample> {
    (0..=50)
        .map(|i| {
            let t = i * 4;
            let x = t as f32 * 0.05;
            Sample::new(t, x.sin(), 0.05 * x.cos())
        })
        .collect()
}

#[test]
fn fit_reproduces_every_sample_within_tolerance() {
    let samples = sine_samples();
    let mut nodes = Vec::new();
    fit_samples(&samples, TOL, &mut nodes);

    assert!(nodes.len() >= 2);
    // A sine arc should need far fewer keyframes than dense samples.
    assert!(nodes.len() < samples.len());
    for s in &samples {
        let (v, _) = evaluate_nodes(&nodes, s.time);
        assert!(
            (v - s.value).abs() <= TOL + EPS,
            "t={} fitted={v} sampled={}",
            s.time,
            s.value
        );
    }
}

#[test]
fn pruned_nodes_still_reconstruct_within_tolerance() {
    let samples = sine_samples();
    let mut nodes = Vec::new();
    fit_samples(&samples, TOL, &mut nodes);

    let before = nodes.clone();
    prune_nodes(&mut nodes, TOL, DA_TOL);
    assert!(nodes.len() <= before.len());

    for n in &before {
        let (v, _) = evaluate_nodes(&nodes, n.time);
        assert!(
            (v - n.value).abs() <= TOL + EPS,
            "t={} reconstructed={v} original={}",
            n.time,
            n.value
        );
    }
}

#[test]
fn pruning_is_idempotent() {
    let samples = sine_samples();
    let mut nodes = Vec::new();
    fit_samples(&samples, TOL, &mut nodes);

    prune_nodes(&mut nodes, TOL, DA_TOL);
    let once = nodes.clone();
    prune_nodes(&mut nodes, TOL, DA_TOL);
    assert_eq!(nodes, once);
}

#[test]
fn constant_samples_collapse_to_one_node() {
    let mut builder = ClipBuilder::new(Tolerances::default(), false);
    let bone = builder.alloc_bone("root", None).unwrap();
    let ch = builder
        .alloc_channel(bone, ChannelOp::TranslateY, OpId(1))
        .unwrap();

    let samples: Vec<Sample> = (0..=20).map(|i| Sample::new(i * 10, 5.0, 0.0)).collect();
    builder.add_curve(bone, ch, &samples).unwrap();
    builder.prune_channel(bone, ch).unwrap();

    assert_eq!(builder.num_nodes(bone, ch).unwrap(), 1);
    assert_eq!(builder.bones()[bone].channels[ch].nodes[0].value, 5.0);
}

#[test]
fn consecutive_spans_share_their_boundary_node() {
    let mut builder = ClipBuilder::new(Tolerances::default(), false);
    let bone = builder.alloc_bone("root", None).unwrap();
    let ch = builder
        .alloc_channel(bone, ChannelOp::TranslateX, OpId(0))
        .unwrap();

    let a = [Sample::new(0, 0.0, 0.02), Sample::new(50, 1.0, 0.02)];
    let b = [Sample::new(50, 1.0, 0.02), Sample::new(100, 2.0, 0.02)];
    builder.add_curve(bone, ch, &a).unwrap();
    builder.add_curve(bone, ch, &b).unwrap();

    // Shared boundary node appears once before pruning.
    assert_eq!(builder.num_nodes(bone, ch).unwrap(), 3);
}

#[test]
fn malformed_ingest_is_rejected() {
    let mut builder = ClipBuilder::new(Tolerances::default(), false);
    let bone = builder.alloc_bone("root", None).unwrap();
    let ch = builder
        .alloc_channel(bone, ChannelOp::RotateX, OpId(3))
        .unwrap();

    assert_eq!(
        builder.add_curve(bone, ch, &[Sample::new(0, 1.0, 0.0)]),
        Err(CurveError::TooFewSamples(1))
    );
    assert_eq!(
        builder.add_curve(
            bone,
            ch,
            &[Sample::new(10, 1.0, 0.0), Sample::new(0, 2.0, 0.0)]
        ),
        Err(CurveError::NonMonotonicTime { index: 1, time: 0 })
    );
    assert_eq!(
        builder.add_constant(bone, ch, f32::NAN),
        Err(CurveError::NonFiniteSample { index: 0 })
    );
    assert_eq!(
        builder.alloc_channel(7, ChannelOp::RotateX, OpId(3)),
        Err(CurveError::BoneOutOfRange(7))
    );
    assert_eq!(
        builder.prune_channel(bone, 9),
        Err(CurveError::ChannelOutOfRange(9))
    );
}
