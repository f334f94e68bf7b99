use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use roxmltree::{Document, Node};
use tracing::info;

use crate::physics::PhysicsPreset;

use super::database::{ActorDef, ActorDefDatabase, ActorDefId};

const DEFAULT_PHYSICS_PRESET: PhysicsPreset = PhysicsPreset::Object;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentErrorCode {
    ReadFile,
    XmlMalformed,
    InvalidRoot,
    UnknownDefType,
    UnknownField,
    DuplicateField,
    MissingField,
    InvalidValue,
    DuplicateDef,
}

#[derive(Debug, Clone)]
pub struct ContentError {
    pub code: ContentErrorCode,
    pub message: String,
    pub file_path: PathBuf,
    pub location: Option<SourceLocation>,
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "{:?}: {} (file={}, line={}, column={})",
                self.code,
                self.message,
                self.file_path.display(),
                loc.line,
                loc.column
            ),
            None => write!(
                f,
                "{:?}: {} (file={})",
                self.code,
                self.message,
                self.file_path.display()
            ),
        }
    }
}

impl std::error::Error for ContentError {}

/// Compiles every `*.xml` under `actors_dir`, visited in sorted relative
/// path order. A missing directory yields an empty database.
pub fn compile_actor_defs(actors_dir: &Path) -> Result<ActorDefDatabase, ContentError> {
    if !actors_dir.is_dir() {
        info!(dir = %actors_dir.display(), "actor_defs_dir_missing");
        return Ok(ActorDefDatabase::default());
    }

    let xml_files = collect_xml_files_sorted(actors_dir)
        .map_err(|error| read_error(error.path, error.source))?;

    let mut merged = BTreeMap::<String, ActorDef>::new();
    for xml_file in &xml_files {
        let raw = fs::read_to_string(xml_file)
            .map_err(|source| read_error(xml_file.clone(), source))?;
        for def in parse_defs_document(xml_file, &raw)? {
            if merged.contains_key(&def.def_name) {
                return Err(ContentError {
                    code: ContentErrorCode::DuplicateDef,
                    message: format!(
                        "duplicate ActorDef '{}'; each defName may be defined only once",
                        def.def_name
                    ),
                    file_path: xml_file.clone(),
                    location: None,
                });
            }
            merged.insert(def.def_name.clone(), def);
        }
    }

    info!(
        files = xml_files.len(),
        defs = merged.len(),
        "actor_defs_compiled"
    );
    Ok(ActorDefDatabase::from_sorted_defs(
        merged.into_values().collect(),
    ))
}

pub fn parse_actor_defs_str(file_path: &Path, raw: &str) -> Result<Vec<ActorDef>, ContentError> {
    parse_defs_document(file_path, raw)
}

fn parse_defs_document(file_path: &Path, raw: &str) -> Result<Vec<ActorDef>, ContentError> {
    let doc = Document::parse(raw).map_err(|error| ContentError {
        code: ContentErrorCode::XmlMalformed,
        message: format!("malformed XML: {error}"),
        file_path: file_path.to_path_buf(),
        location: Some(SourceLocation {
            line: error.pos().row as usize,
            column: error.pos().col as usize,
        }),
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != "ActorDefs" {
        return Err(error_at_node(
            ContentErrorCode::InvalidRoot,
            "root element must be <ActorDefs>".to_string(),
            file_path,
            &doc,
            root,
        ));
    }

    let mut defs = Vec::new();
    for child in root.children().filter(|node| node.is_element()) {
        if child.tag_name().name() != "ActorDef" {
            return Err(error_at_node(
                ContentErrorCode::UnknownDefType,
                format!(
                    "unsupported def type <{}>; only <ActorDef> is allowed",
                    child.tag_name().name()
                ),
                file_path,
                &doc,
                child,
            ));
        }
        defs.push(parse_actor_def(file_path, &doc, child)?);
    }
    Ok(defs)
}

fn parse_actor_def(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> Result<ActorDef, ContentError> {
    let mut seen_fields = HashSet::<String>::new();
    let mut def_name: Option<String> = None;
    let mut label: Option<String> = None;
    let mut physics_preset: Option<PhysicsPreset> = None;
    let mut spawn: Option<Vec3> = None;

    for field in node.children().filter(|child| child.is_element()) {
        let field_name = field.tag_name().name().to_string();
        if !seen_fields.insert(field_name.clone()) {
            return Err(error_at_node(
                ContentErrorCode::DuplicateField,
                format!("duplicate field <{field_name}> in <ActorDef>"),
                file_path,
                doc,
                field,
            ));
        }

        match field_name.as_str() {
            "defName" => def_name = Some(required_text(file_path, doc, field, "defName")?),
            "label" => label = Some(required_text(file_path, doc, field, "label")?),
            "physicsPreset" => {
                let value = required_text(file_path, doc, field, "physicsPreset")?;
                let parsed = value.parse::<PhysicsPreset>().map_err(|error| {
                    error_at_node(
                        ContentErrorCode::InvalidValue,
                        format!(
                            "{error}; allowed values: {}",
                            PhysicsPreset::allowed_names()
                        ),
                        file_path,
                        doc,
                        field,
                    )
                })?;
                physics_preset = Some(parsed);
            }
            "spawn" => {
                let value = required_text(file_path, doc, field, "spawn")?;
                let parsed = parse_vec3(&value).ok_or_else(|| {
                    error_at_node(
                        ContentErrorCode::InvalidValue,
                        format!("spawn '{value}' must be three finite numbers separated by spaces"),
                        file_path,
                        doc,
                        field,
                    )
                })?;
                spawn = Some(parsed);
            }
            _ => {
                return Err(error_at_node(
                    ContentErrorCode::UnknownField,
                    format!("unknown field <{field_name}> in <ActorDef>"),
                    file_path,
                    doc,
                    field,
                ))
            }
        }
    }

    let Some(def_name) = def_name else {
        return Err(error_at_node(
            ContentErrorCode::MissingField,
            "missing required field <defName> in <ActorDef>".to_string(),
            file_path,
            doc,
            node,
        ));
    };
    let label = label.unwrap_or_else(|| def_name.clone());

    Ok(ActorDef {
        id: ActorDefId(0),
        def_name,
        label,
        physics_preset: physics_preset.unwrap_or(DEFAULT_PHYSICS_PRESET),
        spawn: spawn.unwrap_or(Vec3::ZERO),
    })
}

fn parse_vec3(value: &str) -> Option<Vec3> {
    let parts = value
        .split_whitespace()
        .map(str::parse::<f32>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    let [x, y, z] = parts.as_slice() else {
        return None;
    };
    let parsed = Vec3::new(*x, *y, *z);
    parsed.is_finite().then_some(parsed)
}

fn required_text(
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
    field_name: &str,
) -> Result<String, ContentError> {
    let value = node.text().map(str::trim).unwrap_or_default().to_string();
    if value.is_empty() {
        return Err(error_at_node(
            ContentErrorCode::MissingField,
            format!("field <{field_name}> must not be empty"),
            file_path,
            doc,
            node,
        ));
    }
    Ok(value)
}

fn error_at_node(
    code: ContentErrorCode,
    message: String,
    file_path: &Path,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> ContentError {
    let pos = doc.text_pos_at(node.range().start);
    ContentError {
        code,
        message,
        file_path: file_path.to_path_buf(),
        location: Some(SourceLocation {
            line: pos.row as usize,
            column: pos.col as usize,
        }),
    }
}

struct ReadError {
    path: PathBuf,
    source: std::io::Error,
}

fn collect_xml_files_sorted(root: &Path) -> Result<Vec<PathBuf>, ReadError> {
    let mut files = Vec::<(String, PathBuf)>::new();
    collect_recursive(root, root, &mut files)?;
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

fn collect_recursive(
    root: &Path,
    current: &Path,
    files: &mut Vec<(String, PathBuf)>,
) -> Result<(), ReadError> {
    let entries = fs::read_dir(current).map_err(|source| ReadError {
        path: current.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| ReadError {
            path: current.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_recursive(root, &path, files)?;
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        {
            let rel = path.strip_prefix(root).unwrap_or(&path);
            files.push((normalize_rel_path(rel), path.clone()));
        }
    }
    Ok(())
}

fn normalize_rel_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn read_error(path: PathBuf, source: std::io::Error) -> ContentError {
    ContentError {
        code: ContentErrorCode::ReadFile,
        message: format!("failed to read actor defs: {source}"),
        file_path: path,
        location: None,
    }
}
