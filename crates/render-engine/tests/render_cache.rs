use std::path::Path;

use talereel_common::error::{TalereelError, TalereelResult};
use talereel_project_model::ledger::RenderLedger;
use talereel_project_model::manifest::SceneManifest;
use talereel_project_model::project::ProjectLayout;
use talereel_project_model::scene::Scene;
use talereel_render_engine::{render_project, ClipJob, MuxJob, RenderReport, Transcoder};

/// Writes placeholder files and records every call.
#[derive(Default)]
struct RecordingTranscoder {
    clips: Vec<ClipJob>,
    concats: usize,
    muxes: Vec<MuxJob>,
    manifest_seen: String,
    fail_concat: bool,
    fail_clip: Option<usize>,
}

impl Transcoder for RecordingTranscoder {
    fn render_clip(&mut self, job: &ClipJob) -> TalereelResult<()> {
        if self.fail_clip == Some(job.index) {
            return Err(TalereelError::transcode(format!("scene {} exploded", job.index)));
        }
        std::fs::write(&job.output, format!("clip {}", job.index))?;
        self.clips.push(job.clone());
        Ok(())
    }

    fn concat(&mut self, manifest: &Path, output: &Path) -> TalereelResult<()> {
        self.concats += 1;
        self.manifest_seen = std::fs::read_to_string(manifest)?;
        if self.fail_concat {
            return Err(TalereelError::transcode("concat exploded"));
        }
        std::fs::write(output, b"video")?;
        Ok(())
    }

    fn mux(&mut self, job: &MuxJob) -> TalereelResult<()> {
        std::fs::write(&job.output, b"final")?;
        self.muxes.push(job.clone());
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "recording"
    }
}

impl RecordingTranscoder {
    fn rendered(&self) -> Vec<usize> {
        self.clips.iter().map(|c| c.index).collect()
    }
}

fn scenes(durations: &[f64]) -> Vec<Scene> {
    let mut offset = 0.0;
    durations
        .iter()
        .enumerate()
        .map(|(i, &duration)| {
            let scene = Scene {
                index: i + 1,
                text: format!("Scene {}.", i + 1),
                start: offset,
                end: offset + duration,
                offset_start: offset,
                duration,
                start_str: String::new(),
                end_str: String::new(),
                offset_start_str: String::new(),
            };
            offset += duration;
            scene
        })
        .collect()
}

fn project_with_images(images: &[usize]) -> (tempfile::TempDir, ProjectLayout) {
    let dir = tempfile::tempdir().unwrap();
    let layout = ProjectLayout::create(dir.path(), "render-test").unwrap();
    std::fs::write(layout.audio(), b"mp3").unwrap();
    for &i in images {
        std::fs::write(layout.image(i), format!("pixels {i}")).unwrap();
    }
    (dir, layout)
}

fn run(scenes: &[Scene], layout: &ProjectLayout, t: &mut RecordingTranscoder) -> RenderReport {
    let manifest = SceneManifest::scan(layout, scenes.len());
    render_project(scenes, &manifest, layout, t).unwrap()
}

#[test]
fn unchanged_images_render_nothing_on_rerun() {
    let scenes = scenes(&[4.0, 5.0, 6.0]);
    let (_dir, layout) = project_with_images(&[1, 2, 3]);

    let mut first = RecordingTranscoder::default();
    let report = run(&scenes, &layout, &mut first);
    assert_eq!(first.rendered(), vec![1, 2, 3]);
    assert_eq!(report.rendered, vec![1, 2, 3]);
    assert_eq!(RenderLedger::load(&layout.ledger()).unwrap().len(), 3);

    let mut second = RecordingTranscoder::default();
    let report = run(&scenes, &layout, &mut second);
    assert!(second.clips.is_empty());
    assert_eq!(report.skipped, vec![1, 2, 3]);
    // Assembly still runs from cached clips.
    assert_eq!(second.muxes.len(), 1);
}

#[test]
fn one_changed_byte_renders_exactly_that_scene() {
    let scenes = scenes(&[4.0, 5.0, 6.0]);
    let (_dir, layout) = project_with_images(&[1, 2, 3]);
    run(&scenes, &layout, &mut RecordingTranscoder::default());

    std::fs::write(layout.image(2), "pixels 2!").unwrap();

    let mut t = RecordingTranscoder::default();
    let report = run(&scenes, &layout, &mut t);
    assert_eq!(t.rendered(), vec![2]);
    assert_eq!(t.clips[0].duration, 5.0);
    assert_eq!(report.skipped, vec![1, 3]);
}

#[test]
fn deleted_clip_is_rendered_again() {
    let scenes = scenes(&[4.0, 5.0]);
    let (_dir, layout) = project_with_images(&[1, 2]);
    run(&scenes, &layout, &mut RecordingTranscoder::default());

    std::fs::remove_file(layout.clip(1)).unwrap();

    let mut t = RecordingTranscoder::default();
    run(&scenes, &layout, &mut t);
    assert_eq!(t.rendered(), vec![1]);
}

#[test]
fn missing_image_truncates_assembly_to_prefix() {
    let durations = [3.0, 4.5, 5.0, 2.5, 6.0, 7.0, 8.0];
    let scenes = scenes(&durations);
    let (_dir, layout) = project_with_images(&[1, 2, 3, 4, 5, 7]);

    let mut t = RecordingTranscoder::default();
    let report = run(&scenes, &layout, &mut t);

    assert_eq!(t.rendered(), vec![1, 2, 3, 4, 5]);
    assert_eq!(report.missing_images, vec![6]);
    assert_eq!(report.assembled_scenes, 5);

    let expected: f64 = durations[..5].iter().sum();
    assert!((report.total_duration - expected).abs() < 1e-9);
    assert_eq!(t.muxes.len(), 1);
    assert!((t.muxes[0].total_duration - expected).abs() < 1e-9);

    assert_eq!(
        t.manifest_seen,
        "file 'scene_1.mp4'\nfile 'scene_2.mp4'\nfile 'scene_3.mp4'\nfile 'scene_4.mp4'\nfile 'scene_5.mp4'\n"
    );
    assert!(!layout.clip(7).exists());
}

#[test]
fn successful_assembly_removes_intermediates() {
    let scenes = scenes(&[4.0]);
    let (_dir, layout) = project_with_images(&[1]);

    let report = run(&scenes, &layout, &mut RecordingTranscoder::default());
    assert_eq!(report.output, Some(layout.output()));
    assert!(layout.output().is_file());
    assert!(!layout.concat_manifest().exists());
    assert!(!layout.intermediate_video().exists());
}

#[test]
fn concat_failure_is_fatal_and_keeps_ledger_progress() {
    let scenes = scenes(&[4.0, 5.0]);
    let (_dir, layout) = project_with_images(&[1, 2]);

    let mut t = RecordingTranscoder {
        fail_concat: true,
        ..Default::default()
    };
    let manifest = SceneManifest::scan(&layout, scenes.len());
    let err = render_project(&scenes, &manifest, &layout, &mut t).unwrap_err();

    assert!(matches!(err, TalereelError::Transcode { .. }));
    assert!(err.is_fatal());
    assert!(!layout.output().exists());
    assert_eq!(RenderLedger::load(&layout.ledger()).unwrap().len(), 2);
}

#[test]
fn clip_failure_keeps_only_finished_clips_in_ledger() {
    let scenes = scenes(&[4.0, 5.0, 6.0]);
    let (_dir, layout) = project_with_images(&[1, 2, 3]);

    let mut t = RecordingTranscoder {
        fail_clip: Some(2),
        ..Default::default()
    };
    let manifest = SceneManifest::scan(&layout, scenes.len());
    let err = render_project(&scenes, &manifest, &layout, &mut t).unwrap_err();

    assert!(matches!(err, TalereelError::Transcode { .. }));
    assert_eq!(t.rendered(), vec![1]);
    assert_eq!(t.concats, 0);

    let ledger = RenderLedger::load(&layout.ledger()).unwrap();
    assert_eq!(ledger.len(), 1);
    assert!(ledger.get(1).is_some());
    assert!(ledger.get(2).is_none());

    let mut rerun = RecordingTranscoder::default();
    let report = run(&scenes, &layout, &mut rerun);
    assert_eq!(rerun.rendered(), vec![2, 3]);
    assert_eq!(report.skipped, vec![1]);
    assert_eq!(RenderLedger::load(&layout.ledger()).unwrap().len(), 3);
}

#[test]
fn no_images_means_no_output() {
    let scenes = scenes(&[4.0, 5.0]);
    let (_dir, layout) = project_with_images(&[2]);

    let mut t = RecordingTranscoder::default();
    let report = run(&scenes, &layout, &mut t);
    assert!(t.clips.is_empty());
    assert_eq!(t.concats, 0);
    assert_eq!(report.output, None);
    assert_eq!(report.missing_images, vec![1]);
}
