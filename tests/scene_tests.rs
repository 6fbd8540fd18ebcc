//! End-to-end tests of generation, regeneration and the frame loop, driven
//! through the public API with an in-memory host instead of a GPU.

use galaxy::{
    BlendMode, CommitTracker, ControlResponse, FrameLoop, GalaxyParams, GalaxyScene,
    PointCloudBuffers, PointCloudHost, PointsMaterial, Rgb,
};

/// Host that keeps copies of what it was given and tracks live handles.
#[derive(Default)]
struct MemoryHost {
    next_handle: u64,
    live: Vec<u64>,
    installed: Vec<(usize, PointsMaterial)>,
    released: usize,
}

impl PointCloudHost for MemoryHost {
    type Resource = u64;

    fn install_point_cloud(&mut self, buffers: &PointCloudBuffers, material: &PointsMaterial) -> u64 {
        self.next_handle += 1;
        self.live.push(self.next_handle);
        self.installed.push((buffers.len(), *material));
        self.next_handle
    }

    fn release_point_cloud(&mut self, handle: u64) {
        assert!(self.live.contains(&handle), "released a handle twice");
        self.live.retain(|&h| h != handle);
        self.released += 1;
    }
}

#[test]
fn test_default_galaxy_scenario() {
    let mut host = MemoryHost::default();
    let mut scene = GalaxyScene::with_seed(GalaxyParams::default(), 2024);

    let buffers = scene.regenerate(&mut host).clone();

    assert_eq!(buffers.position_floats().len(), 300_000);
    assert_eq!(buffers.color_floats().len(), 300_000);

    let limit = 3.0 * (1.0 + 0.2) + 1e-4;
    for p in &buffers.positions {
        assert!(p.iter().all(|v| v.is_finite()));
        assert!(p[0].abs() <= limit && p[2].abs() <= limit, "{:?} outside disk", p);
    }

    let (len, material) = host.installed[0];
    assert_eq!(len, 100_000);
    assert_eq!(material.size, 0.02);
    assert!(material.size_attenuation);
    assert!(!material.depth_write);
    assert!(material.vertex_colors);
    assert_eq!(material.blend_mode, BlendMode::Additive);
}

#[test]
fn test_one_live_cloud_after_many_regenerations() {
    let mut host = MemoryHost::default();
    let params = GalaxyParams {
        count: 500,
        ..GalaxyParams::default()
    };
    let mut scene = GalaxyScene::with_seed(params, 3);

    for _ in 0..10 {
        scene.regenerate(&mut host);
        assert_eq!(host.live.len(), 1);
    }
    assert_eq!(scene.generation(), 10);
    assert_eq!(host.released, 9);
    assert_eq!(scene.points(), Some(&10));

    scene.dispose(&mut host);
    assert!(host.live.is_empty());
    assert!(!scene.is_installed());
}

#[test]
fn test_committed_edit_regenerates_with_new_params() {
    let mut host = MemoryHost::default();
    let mut scene = GalaxyScene::with_seed(
        GalaxyParams {
            count: 1_000,
            ..GalaxyParams::default()
        },
        11,
    );
    scene.regenerate(&mut host);

    // Drag the count slider over three frames, then release
    let mut tracker = CommitTracker::new();
    let mut draft = *scene.params();
    let frames = [
        (2_000, true, false),
        (3_000, true, false),
        (4_000, true, false),
        (4_000, false, true),
    ];
    for (count, dragging, released) in frames {
        draft.count = count;
        let response = ControlResponse {
            changed: dragging,
            interacting: dragging,
            finished: released,
        };
        if tracker.observe(response) {
            scene.set_params(draft);
            scene.regenerate(&mut host);
        }
    }

    assert_eq!(tracker.commits(), 1);
    assert_eq!(scene.generation(), 2);
    assert_eq!(scene.buffers().len(), 4_000);
    assert_eq!(host.live.len(), 1);
}

#[test]
fn test_colors_change_on_regenerate() {
    let mut host = MemoryHost::default();
    let params = GalaxyParams {
        count: 200,
        randomness: 0.0,
        ..GalaxyParams::default()
    };
    let mut scene = GalaxyScene::with_seed(params, 5);
    scene.regenerate(&mut host);

    scene.set_params(GalaxyParams {
        inside_color: Rgb::WHITE,
        outside_color: Rgb::WHITE,
        ..params
    });
    let buffers = scene.regenerate(&mut host);
    assert!(buffers.colors.iter().all(|c| *c == [1.0, 1.0, 1.0]));
}

#[test]
fn test_frame_loop_drives_bounded_regenerations() {
    let mut host = MemoryHost::default();
    let mut scene = GalaxyScene::with_seed(
        GalaxyParams {
            count: 100,
            ..GalaxyParams::default()
        },
        9,
    );

    let mut frame_loop = FrameLoop::bounded(5);
    let ran = frame_loop.run(|info| {
        if info.frame % 2 == 1 {
            scene.regenerate(&mut host);
        }
    });

    assert_eq!(ran, 5);
    assert_eq!(scene.generation(), 3);
    assert_eq!(host.live.len(), 1);
}

#[test]
fn test_same_seed_same_galaxy() {
    let params = GalaxyParams {
        count: 2_000,
        ..GalaxyParams::default()
    };
    let mut a = GalaxyScene::<MemoryHost>::with_seed(params, 77);
    let mut b = GalaxyScene::<MemoryHost>::with_seed(params, 77);

    let mut host = MemoryHost::default();
    let first = a.regenerate(&mut host).clone();
    let second = b.regenerate(&mut host).clone();
    assert_eq!(first, second);
}
