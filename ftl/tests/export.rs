mod support;

use std::fs;

use ftl::prelude::*;
use serde_json::Value;
use support::{encode, goblin, triangle};

fn exported(model: &Model) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for format in ExportFormat::ALL {
        format.exporter().export(model, dir.path()).unwrap();
    }
    dir
}

#[test]
fn output_layout() {
    let model = decode(&encode(&goblin())).unwrap();
    let dir = exported(&model);
    for file in [
        "RAW/JSON/Headers.json",
        "RAW/JSON/Data.json",
        "RAW/XML/Headers.xml",
        "RAW/XML/Data.xml",
        "OBJ/model.obj",
        "OBJ/model.mtl",
        "GLTF/model.gltf",
        "GLTF/model.bin",
    ] {
        assert!(dir.path().join(file).is_file(), "missing {file}");
    }
}

#[test]
fn triangle_uses_default_material() {
    let model = decode(&encode(&triangle())).unwrap();
    let dir = exported(&model);

    let mtl = fs::read_to_string(dir.path().join("OBJ/model.mtl")).unwrap();
    assert!(mtl.contains("newmtl Default"));
    assert!(!mtl.contains("Material_0"));

    let obj = fs::read_to_string(dir.path().join("OBJ/model.obj")).unwrap();
    assert_eq!(obj.lines().filter(|l| l.starts_with("v ")).count(), 3);
    assert_eq!(obj.lines().filter(|l| l.starts_with("vt ")).count(), 3);
    assert!(obj.contains("usemtl Default\nf 1/1/1 2/2/2 3/3/3\n"));
}

#[test]
fn gltf_matches_binary() {
    let model = decode(&encode(&goblin())).unwrap();
    let dir = exported(&model);

    let text = fs::read_to_string(dir.path().join("GLTF/model.gltf")).unwrap();
    let root: Value = serde_json::from_str(&text).unwrap();
    let bin = fs::read(dir.path().join("GLTF/model.bin")).unwrap();

    assert_eq!(root["buffers"][0]["uri"], "model.bin");
    assert_eq!(root["buffers"][0]["byteLength"], bin.len());
    assert_eq!(root["meshes"][0]["name"], "goblin_base");
    // untextured, skin, eyes
    assert_eq!(root["meshes"][0]["primitives"].as_array().unwrap().len(), 3);
    assert_eq!(root["nodes"][1]["name"], "primary_attach");
    assert_eq!(root["nodes"][1]["translation"], serde_json::json!([0.0, 10.0, -5.0]));

    // First chunk holds the positions, Y and Z negated.
    let x = f32::from_le_bytes(bin[36..40].try_into().unwrap());
    let y = f32::from_le_bytes(bin[40..44].try_into().unwrap());
    assert_eq!((x, y), (0.0, 10.0));
}

#[test]
fn json_round_trips_through_serde() {
    let model = decode(&encode(&goblin())).unwrap();
    let dir = exported(&model);
    let text = fs::read_to_string(dir.path().join("RAW/JSON/Data.json")).unwrap();
    let data: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(data["groups"][0]["vertexIndices"], serde_json::json!([2, 3]));
    assert_eq!(data["cloth"]["springs"][0]["stiffness"], f64::from(0.8f32));
    assert_eq!(data["actions"][0]["soundId"], -1);
}

#[test]
fn exporters_share_a_model_across_threads() {
    let model = decode(&encode(&goblin())).unwrap();
    let dir = tempfile::tempdir().unwrap();
    std::thread::scope(|s| {
        for format in ExportFormat::ALL {
            let (model, path) = (&model, dir.path());
            s.spawn(move || format.exporter().export(model, path).unwrap());
        }
    });
    assert!(dir.path().join("GLTF/model.gltf").is_file());
}
