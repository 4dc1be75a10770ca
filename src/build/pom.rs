//! Project descriptor (pom.xml) loading and reactor discovery
//!
//! Descriptors are always read fresh from disk: earlier workflow steps may
//! have rewritten versions since the process started.

use crate::core::error::{ConfigError, FlowError, FlowResult};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

/// Descriptor file name looked up inside module directories
pub const DESCRIPTOR_FILE: &str = "pom.xml";

/// Parent chains deeper than this are treated as broken
const MAX_PARENT_DEPTH: usize = 16;

/// `${...}` resolution passes before giving up on nested references
const MAX_INTERPOLATION_PASSES: usize = 8;

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static IGNORED_BLOCKS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
  ["profiles", "build", "reporting", "distributionManagement", "exclusions"]
    .iter()
    .map(|tag| Regex::new(&format!(r"(?s)<{tag}>.*?</{tag}>")).expect("valid regex"))
    .collect()
});
static PARENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<parent>(.*?)</parent>").expect("valid regex"));
static DEPENDENCY_MANAGEMENT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?s)<dependencyManagement>(.*?)</dependencyManagement>").expect("valid regex"));
static DEPENDENCIES: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?s)<dependencies>(.*?)</dependencies>").expect("valid regex"));
static DEPENDENCY: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?s)<dependency>(.*?)</dependency>").expect("valid regex"));
static PROPERTIES: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?s)<properties>(.*?)</properties>").expect("valid regex"));
static PROPERTY: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"<([A-Za-z0-9_.\-]+)>\s*([^<]*?)\s*</([A-Za-z0-9_.\-]+)>").expect("valid regex"));
static MODULES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<modules>(.*?)</modules>").expect("valid regex"));
static MODULE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<module>\s*([^<]+?)\s*</module>").expect("valid regex"));
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

/// group:artifact:version of a module or one of its dependencies
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DependencyRecord {
  pub group_id: String,
  pub artifact_id: String,
  pub version: String,
}

impl DependencyRecord {
  pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>, version: impl Into<String>) -> Self {
    Self {
      group_id: group_id.into(),
      artifact_id: artifact_id.into(),
      version: version.into(),
    }
  }
}

impl fmt::Display for DependencyRecord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
  }
}

/// One project descriptor after inheritance and interpolation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectModel {
  pub path: PathBuf,
  pub coordinate: DependencyRecord,
  pub parent: Option<DependencyRecord>,
  pub properties: BTreeMap<String, String>,
  pub dependencies: Vec<DependencyRecord>,
  /// `<dependencyManagement>` entries, own entries overriding inherited ones
  pub dependency_management: Vec<DependencyRecord>,
  pub modules: Vec<String>,
}

impl ProjectModel {
  /// Directory containing the descriptor
  pub fn base_dir(&self) -> &Path {
    self.path.parent().unwrap_or_else(|| Path::new("."))
  }

  /// Version, `None` when it stayed an unresolved reference or was never declared
  pub fn version(&self) -> Option<&str> {
    let v = self.coordinate.version.as_str();
    (!v.is_empty() && !REFERENCE.is_match(v)).then_some(v)
  }
}

/// Source of project models
pub trait ProjectLoader {
  /// Load the descriptor at `path`. `user_properties` override descriptor properties.
  fn load(&self, path: &Path, user_properties: &BTreeMap<String, String>) -> FlowResult<ProjectModel>;
}

/// Reads `pom.xml` files with a tolerant regex scan
#[derive(Debug, Default, Clone, Copy)]
pub struct PomLoader;

impl PomLoader {
  pub fn new() -> Self {
    PomLoader
  }

  fn load_at_depth(
    &self,
    path: &Path,
    user_properties: &BTreeMap<String, String>,
    depth: usize,
  ) -> FlowResult<ProjectModel> {
    let content = std::fs::read_to_string(path).map_err(|e| descriptor_error(path, format!("cannot read: {}", e)))?;
    let raw = RawPom::parse(&content);
    debug!("Loaded descriptor {}", path.display());

    let artifact_id = raw
      .artifact_id
      .clone()
      .ok_or_else(|| descriptor_error(path, "missing <artifactId>"))?;

    // Properties and managed versions are inherited from a parent found on disk at its relative path
    let mut properties = BTreeMap::new();
    let mut inherited_management = Vec::new();
    if let Some(parent) = &raw.parent
      && depth < MAX_PARENT_DEPTH
      && let Some(parent_path) = parent_descriptor(path, parent.relative_path.as_deref())
    {
      let parent_model = self.load_at_depth(&parent_path, user_properties, depth + 1)?;
      if parent_model.coordinate.artifact_id == parent.artifact_id {
        properties.extend(parent_model.properties);
        inherited_management = parent_model.dependency_management;
      }
    }
    properties.extend(raw.properties.clone());

    let parent_record = raw.parent.as_ref().map(|p| {
      DependencyRecord::new(
        p.group_id.clone().unwrap_or_default(),
        p.artifact_id.clone(),
        p.version.clone().unwrap_or_default(),
      )
    });

    let group_id = raw
      .group_id
      .clone()
      .or_else(|| parent_record.as_ref().map(|p| p.group_id.clone()))
      .unwrap_or_default();
    let version = raw
      .version
      .clone()
      .or_else(|| parent_record.as_ref().map(|p| p.version.clone()))
      .unwrap_or_default();

    let mut lookup = Lookup {
      user: user_properties,
      properties: &properties,
      builtins: BTreeMap::new(),
    };
    lookup.builtins.insert("project.groupId".to_string(), group_id.clone());
    lookup.builtins.insert("project.artifactId".to_string(), artifact_id.clone());
    lookup.builtins.insert("project.version".to_string(), version.clone());
    lookup.builtins.insert("pom.version".to_string(), version.clone());
    lookup.builtins.insert("version".to_string(), version.clone());
    if let Some(p) = &parent_record {
      lookup.builtins.insert("project.parent.groupId".to_string(), p.group_id.clone());
      lookup.builtins.insert("project.parent.version".to_string(), p.version.clone());
    }

    let resolved = |value: &str| lookup.interpolate(value);
    let coordinate = DependencyRecord::new(resolved(&group_id), resolved(&artifact_id), resolved(&version));
    let parent = parent_record.map(|p| DependencyRecord::new(resolved(&p.group_id), p.artifact_id, resolved(&p.version)));

    let mut managed: BTreeMap<(String, String), DependencyRecord> = inherited_management
      .into_iter()
      .map(|d| ((d.group_id.clone(), d.artifact_id.clone()), d))
      .collect();
    for d in &raw.managed {
      let record = DependencyRecord::new(resolved(&d.group_id), resolved(&d.artifact_id), resolved(&d.version));
      managed.insert((record.group_id.clone(), record.artifact_id.clone()), record);
    }

    // A dependency without a version takes the managed one for its group:artifact
    let dependencies = raw
      .dependencies
      .iter()
      .map(|d| {
        let group_id = resolved(&d.group_id);
        let artifact_id = resolved(&d.artifact_id);
        let version = if d.version.is_empty() {
          managed
            .get(&(group_id.clone(), artifact_id.clone()))
            .map(|m| m.version.clone())
            .unwrap_or_default()
        } else {
          resolved(&d.version)
        };
        DependencyRecord::new(group_id, artifact_id, version)
      })
      .collect();
    let resolved_properties = properties.iter().map(|(k, v)| (k.clone(), resolved(v))).collect();

    Ok(ProjectModel {
      path: path.to_path_buf(),
      coordinate,
      parent,
      properties: resolved_properties,
      dependencies,
      dependency_management: managed.into_values().collect(),
      modules: raw.modules,
    })
  }
}

impl ProjectLoader for PomLoader {
  fn load(&self, path: &Path, user_properties: &BTreeMap<String, String>) -> FlowResult<ProjectModel> {
    self.load_at_depth(path, user_properties, 0)
  }
}

/// Ordered descriptors of every module taking part in one build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reactor {
  descriptors: Vec<PathBuf>,
}

impl Reactor {
  /// Walk `<modules>` from the root descriptor, parents before children.
  ///
  /// `root` may be the descriptor itself or the directory holding it.
  pub fn discover(
    root: &Path,
    loader: &dyn ProjectLoader,
    user_properties: &BTreeMap<String, String>,
  ) -> FlowResult<Self> {
    let root = normalize(&descriptor_path(root));
    if !root.is_file() {
      return Err(descriptor_error(&root, "no project descriptor found"));
    }

    let mut descriptors = Vec::new();
    let mut seen = BTreeSet::new();
    let mut stack = vec![root];

    while let Some(path) = stack.pop() {
      if !seen.insert(path.clone()) {
        continue;
      }
      let model = loader.load(&path, user_properties)?;
      // reversed so the first declared module is visited first
      for module in model.modules.iter().rev() {
        stack.push(normalize(&descriptor_path(&model.base_dir().join(module))));
      }
      descriptors.push(path);
    }

    Ok(Self { descriptors })
  }

  pub fn root(&self) -> &Path {
    &self.descriptors[0]
  }

  pub fn descriptors(&self) -> &[PathBuf] {
    &self.descriptors
  }
}

/// `dir/pom.xml` for directories, the path itself otherwise
pub fn descriptor_path(path: &Path) -> PathBuf {
  if path.is_dir() {
    path.join(DESCRIPTOR_FILE)
  } else {
    path.to_path_buf()
  }
}

/// Lexically drop `.` and resolve `..` against the preceding component
fn normalize(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match out.components().next_back() {
        Some(Component::Normal(_)) => {
          out.pop();
        }
        Some(Component::RootDir | Component::Prefix(_)) => {}
        _ => out.push(".."),
      },
      other => out.push(other.as_os_str()),
    }
  }
  out
}

fn parent_descriptor(child: &Path, relative_path: Option<&str>) -> Option<PathBuf> {
  let dir = child.parent()?;
  let candidate = match relative_path {
    Some(rel) if rel.trim().is_empty() => return None,
    Some(rel) => descriptor_path(&dir.join(rel)),
    None => dir.join("..").join(DESCRIPTOR_FILE),
  };
  candidate.is_file().then_some(candidate)
}

fn descriptor_error(path: &Path, reason: impl Into<String>) -> FlowError {
  FlowError::Config(ConfigError::Descriptor {
    path: path.to_path_buf(),
    reason: reason.into(),
  })
}

struct Lookup<'a> {
  user: &'a BTreeMap<String, String>,
  properties: &'a BTreeMap<String, String>,
  builtins: BTreeMap<String, String>,
}

impl Lookup<'_> {
  fn get(&self, key: &str) -> Option<&str> {
    self
      .user
      .get(key)
      .or_else(|| self.builtins.get(key))
      .or_else(|| self.properties.get(key))
      .map(String::as_str)
  }

  /// Unknown references are left as written
  fn interpolate(&self, value: &str) -> String {
    let mut current = value.to_string();
    for _ in 0..MAX_INTERPOLATION_PASSES {
      if !REFERENCE.is_match(&current) {
        break;
      }
      let next = REFERENCE
        .replace_all(&current, |caps: &regex::Captures<'_>| {
          self.get(&caps[1]).map_or_else(|| caps[0].to_string(), str::to_string)
        })
        .into_owned();
      if next == current {
        break;
      }
      current = next;
    }
    current
  }
}

struct RawParent {
  group_id: Option<String>,
  artifact_id: String,
  version: Option<String>,
  relative_path: Option<String>,
}

struct RawDependency {
  group_id: String,
  artifact_id: String,
  version: String,
}

struct RawPom {
  group_id: Option<String>,
  artifact_id: Option<String>,
  version: Option<String>,
  parent: Option<RawParent>,
  properties: BTreeMap<String, String>,
  dependencies: Vec<RawDependency>,
  managed: Vec<RawDependency>,
  modules: Vec<String>,
}

impl RawPom {
  fn parse(content: &str) -> Self {
    let mut body = COMMENT.replace_all(content, "").into_owned();
    for block in IGNORED_BLOCKS.iter() {
      body = block.replace_all(&body, "").into_owned();
    }

    let parent = PARENT.captures(&body).and_then(|caps| {
      let block = &caps[1];
      Some(RawParent {
        group_id: element(block, "groupId"),
        artifact_id: element(block, "artifactId")?,
        version: element(block, "version"),
        relative_path: raw_element(block, "relativePath"),
      })
    });
    body = PARENT.replace_all(&body, "").into_owned();

    let properties = PROPERTIES
      .captures(&body)
      .map(|caps| {
        PROPERTY
          .captures_iter(&caps[1])
          .filter(|p| p[1] == p[3])
          .map(|p| (p[1].to_string(), p[2].to_string()))
          .collect()
      })
      .unwrap_or_default();
    body = PROPERTIES.replace_all(&body, "").into_owned();

    let managed = DEPENDENCY_MANAGEMENT
      .captures(&body)
      .map(|caps| dependency_list(&caps[1]))
      .unwrap_or_default();
    body = DEPENDENCY_MANAGEMENT.replace_all(&body, "").into_owned();

    let dependencies = dependency_list(&body);
    body = DEPENDENCIES.replace_all(&body, "").into_owned();

    let modules = MODULES
      .captures(&body)
      .map(|caps| MODULE.captures_iter(&caps[1]).map(|m| m[1].to_string()).collect())
      .unwrap_or_default();
    body = MODULES.replace_all(&body, "").into_owned();

    Self {
      group_id: element(&body, "groupId"),
      artifact_id: element(&body, "artifactId"),
      version: element(&body, "version"),
      parent,
      properties,
      dependencies,
      managed,
      modules,
    }
  }
}

/// Entries of the first `<dependencies>` block in `block`
fn dependency_list(block: &str) -> Vec<RawDependency> {
  DEPENDENCIES
    .captures(block)
    .map(|caps| {
      DEPENDENCY
        .captures_iter(&caps[1])
        .filter_map(|d| {
          let block = &d[1];
          Some(RawDependency {
            group_id: element(block, "groupId")?,
            artifact_id: element(block, "artifactId")?,
            version: element(block, "version").unwrap_or_default(),
          })
        })
        .collect()
    })
    .unwrap_or_default()
}

/// Trimmed text of the first `<tag>`, `None` when absent or empty
fn element(block: &str, tag: &str) -> Option<String> {
  raw_element(block, tag).filter(|v| !v.is_empty())
}

/// Trimmed text of the first `<tag>`, keeping empty values
fn raw_element(block: &str, tag: &str) -> Option<String> {
  let open = format!("<{}>", tag);
  let close = format!("</{}>", tag);
  let start = block.find(&open)? + open.len();
  let end = block[start..].find(&close)? + start;
  Some(block[start..end].trim().to_string())
}
