use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sandbox::{ActorWorld, PresetField, TransformField};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ActorDump {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) transform: TransformField,
    pub(crate) physics: PresetField,
}

pub(crate) fn dump_world(world: &ActorWorld) -> Vec<ActorDump> {
    world
        .actors()
        .iter()
        .map(|actor| ActorDump {
            id: actor.id.0,
            name: actor.name.clone(),
            transform: actor.transform.into(),
            physics: PresetField::read_from(actor),
        })
        .collect()
}

pub(crate) fn write_dump(path: &Path, dumps: &[ActorDump]) -> Result<(), String> {
    let json = serde_json::to_string_pretty(dumps)
        .map_err(|error| format!("encode actor dump json: {error}"))?;
    write_text_atomic(path, &json)
        .map_err(|error| format!("write actor dump '{}': {error}", path.display()))
}

fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = temp_path_for(path);
    fs::write(&tmp_path, text)?;
    if let Err(error) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("dump.json");
    let tmp_name = format!("{file_name}.tmp");
    match path.parent() {
        Some(parent) => parent.join(tmp_name),
        None => PathBuf::from(tmp_name),
    }
}
