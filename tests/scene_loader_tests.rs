//! Scene file tests against real gzip files on disk

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tilescreen::core::{GridSnapshot, Rgba, TileGrid};
use tilescreen::scene::{self, Error};

/// Write a hand-assembled scene body as a gzip file
fn write_scene(dir: &Path, name: &str, body: &[u8]) -> PathBuf {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
    encoder.write_all(body).unwrap();
    let path = dir.join(name);
    fs::write(&path, encoder.finish().unwrap()).unwrap();
    path
}

fn push_i32(body: &mut Vec<u8>, value: i32) {
    body.extend_from_slice(&value.to_le_bytes());
}

/// Body with one layer per `(width, height, char, fg, bg)` entry
fn scene_body(layers: &[(i32, i32, char, [u8; 3], [u8; 3])]) -> Vec<u8> {
    let mut body = Vec::new();
    push_i32(&mut body, -1);
    push_i32(&mut body, layers.len() as i32);
    for &(width, height, c, fg, bg) in layers {
        push_i32(&mut body, width);
        push_i32(&mut body, height);
        for _ in 0..width * height {
            push_i32(&mut body, c as i32);
            body.extend_from_slice(&fg);
            body.extend_from_slice(&bg);
        }
    }
    body
}

#[test]
fn test_transparent_layer_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_scene(
        dir.path(),
        "magenta.xp",
        &scene_body(&[(6, 6, ' ', [0, 0, 0], [255, 0, 255])]),
    );

    let layers = scene::load(&path).unwrap();
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0].len(), 36);
    for (_, _, tile) in layers[0].iter() {
        assert_eq!(tile.background().a, 0);
        assert_eq!(tile.foreground(), Rgba::rgb(0, 0, 0));
    }
}

#[test]
fn test_truncated_second_layer_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = scene_body(&[(3, 3, 'a', [1, 2, 3], [4, 5, 6])]);
    // Claim a second layer that never arrives
    body[4..8].copy_from_slice(&2i32.to_le_bytes());
    let path = write_scene(dir.path(), "short.xp", &body);

    match scene::load(&path) {
        Err(Error::Parse { layer, .. }) => assert_eq!(layer, 1),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_layers_are_independent_roots() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_scene(
        dir.path(),
        "layers.xp",
        &scene_body(&[
            (4, 2, '.', [90, 90, 90], [0, 0, 0]),
            (4, 2, '@', [255, 255, 255], [255, 0, 255]),
        ]),
    );

    let (scene, ids) = scene::load_scene(&path).unwrap();
    assert_eq!(ids.len(), 2);
    for id in &ids {
        assert_eq!(scene.parent(*id), None);
        assert!(scene.children(*id).is_empty());
    }
    let top = scene.get(ids[1]).unwrap();
    assert_eq!(top.get(3, 1).unwrap().code_point(), '@');
}

#[test]
fn test_missing_and_corrupt_files() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        scene::load(dir.path().join("nope.xp")),
        Err(Error::NotFound(_))
    ));

    let corrupt = dir.path().join("corrupt.xp");
    fs::write(&corrupt, b"plain bytes, no gzip header").unwrap();
    assert!(matches!(scene::load(&corrupt), Err(Error::Io(_))));
}

#[test]
fn test_saved_scene_snapshot() {
    let mut grid = TileGrid::new(6, 2);
    grid.write_str(0, 0, "HP 10", Rgba::rgb(220, 40, 40), Rgba::BLACK);
    grid.write_str(0, 1, "MP 3", Rgba::rgb(40, 40, 220), Rgba::TRANSPARENT);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hud.xp");
    scene::save(&path, &[grid]).unwrap();

    let layers = scene::load(&path).unwrap();
    let snapshot = GridSnapshot::from_grid(&layers[0]);
    assert_eq!(snapshot.text(), "HP 10 \nMP 3  ");
    assert_eq!(snapshot.rows[0].spans[0].fg, "#dc2828ff");
    assert_eq!(snapshot.rows[1].spans[0].bg, "#ff00ff00");
}
