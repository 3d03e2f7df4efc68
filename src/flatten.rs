//! Format detection and flattening of configuration files.
//!
//! Every supported format is parsed into a generic tree which is then
//! flattened into dotted-path keys: nested mappings produce `parent.child`,
//! sequences produce `parent[0]`, `parent[1]`, and each leaf scalar produces
//! exactly one entry.
//!
//! | Extension           | Format                         |
//! |---------------------|--------------------------------|
//! | `yaml`, `yml`       | YAML (serde_yaml)              |
//! | `toml`              | TOML (toml)                    |
//! | `properties`        | Java properties                |
//! | `json`              | JSON (serde_json)              |
//! | anything else       | `key=value` lines, `#` comments |

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::address::extract_addresses;
use crate::error::FlattenError;
use crate::fs_abstraction::FileSystem;

/// Input format, inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Yaml,
    Toml,
    Properties,
    Json,
    KeyValue,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "yaml" | "yml" => Format::Yaml,
            "toml" => Format::Toml,
            "properties" => Format::Properties,
            "json" => Format::Json,
            _ => Format::KeyValue,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Yaml => write!(f, "yaml"),
            Format::Toml => write!(f, "toml"),
            Format::Properties => write!(f, "properties"),
            Format::Json => write!(f, "json"),
            Format::KeyValue => write!(f, "key=value"),
        }
    }
}

/// Flattened configuration: dotted-path key -> stringified scalar, sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlatConfig {
    entries: BTreeMap<String, String>,
}

impl FlatConfig {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Address literals found in any value, de-duplicated and sorted.
    pub fn addresses(&self) -> BTreeSet<String> {
        self.values().flat_map(extract_addresses).collect()
    }
}

/// Generic nested value all structured formats are converted into.
enum Node {
    Map(Vec<(String, Node)>),
    Seq(Vec<Node>),
    Scalar(String),
    Null,
}

/// Read and flatten one file.
pub fn flatten_file(fs: &dyn FileSystem, path: &Path) -> Result<FlatConfig, FlattenError> {
    let text = fs.read_to_string(path)?;
    flatten_str(Format::from_path(path), &text)
}

/// Flatten file contents of a known format. Whitespace-only input is an
/// empty configuration in every format.
pub fn flatten_str(format: Format, text: &str) -> Result<FlatConfig, FlattenError> {
    if text.trim().is_empty() {
        return Ok(FlatConfig::default());
    }

    let root = match format {
        Format::Yaml => yaml_node(serde_yaml::from_str(text)?),
        Format::Toml => toml_node(toml::Value::Table(toml::from_str::<toml::Table>(text)?)),
        Format::Json => json_node(serde_json::from_str(text)?),
        Format::Properties => {
            let props = java_properties::read(text.as_bytes())?;
            return Ok(FlatConfig::from_pairs(props));
        }
        Format::KeyValue => return Ok(parse_key_value(text)),
    };

    let mut entries = BTreeMap::new();
    match root {
        Node::Null => {}
        Node::Scalar(_) => return Err(FlattenError::NotAStructure),
        node => flatten_node(node, "", &mut entries),
    }
    Ok(FlatConfig { entries })
}

fn flatten_node(node: Node, prefix: &str, out: &mut BTreeMap<String, String>) {
    match node {
        Node::Map(children) => {
            for (key, child) in children {
                let path = if prefix.is_empty() {
                    key
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_node(child, &path, out);
            }
        }
        Node::Seq(items) => {
            for (i, item) in items.into_iter().enumerate() {
                flatten_node(item, &format!("{}[{}]", prefix, i), out);
            }
        }
        Node::Scalar(value) => {
            out.insert(prefix.to_string(), value);
        }
        Node::Null => {
            out.insert(prefix.to_string(), "null".to_string());
        }
    }
}

/// Plain `key=value` text. The first `=` splits; lines starting with `=`
/// and lines without `=` are ignored.
fn parse_key_value(text: &str) -> FlatConfig {
    let mut entries = BTreeMap::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            if key.is_empty() {
                continue;
            }
            entries.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    FlatConfig { entries }
}

/// Floats with no fractional part keep a trailing `.0` so that `1.0` reads
/// the same whichever format it came from.
fn render_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

fn yaml_node(value: serde_yaml::Value) -> Node {
    use serde_yaml::Value;
    match value {
        Value::Null => Node::Null,
        Value::Bool(b) => Node::Scalar(b.to_string()),
        Value::Number(n) => Node::Scalar(yaml_number(&n)),
        Value::String(s) => Node::Scalar(s),
        Value::Sequence(items) => Node::Seq(items.into_iter().map(yaml_node).collect()),
        Value::Mapping(map) => Node::Map(
            map.into_iter()
                .map(|(k, v)| (yaml_key(k), yaml_node(v)))
                .collect(),
        ),
        Value::Tagged(tagged) => yaml_node(tagged.value),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> String {
    if n.is_i64() || n.is_u64() {
        n.to_string()
    } else {
        n.as_f64().map(render_float).unwrap_or_else(|| n.to_string())
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    use serde_yaml::Value;
    match key {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => yaml_number(&n),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn toml_node(value: toml::Value) -> Node {
    use toml::Value;
    match value {
        Value::String(s) => Node::Scalar(s),
        Value::Integer(i) => Node::Scalar(i.to_string()),
        Value::Float(f) => Node::Scalar(render_float(f)),
        Value::Boolean(b) => Node::Scalar(b.to_string()),
        Value::Datetime(dt) => Node::Scalar(dt.to_string()),
        Value::Array(items) => Node::Seq(items.into_iter().map(toml_node).collect()),
        Value::Table(table) => {
            Node::Map(table.into_iter().map(|(k, v)| (k, toml_node(v))).collect())
        }
    }
}

fn json_node(value: serde_json::Value) -> Node {
    use serde_json::Value;
    match value {
        Value::Null => Node::Null,
        Value::Bool(b) => Node::Scalar(b.to_string()),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                Node::Scalar(n.to_string())
            } else {
                Node::Scalar(n.as_f64().map(render_float).unwrap_or_else(|| n.to_string()))
            }
        }
        Value::String(s) => Node::Scalar(s),
        Value::Array(items) => Node::Seq(items.into_iter().map(json_node).collect()),
        Value::Object(map) => Node::Map(map.into_iter().map(|(k, v)| (k, json_node(v))).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_abstraction::{real_fs, MockFileSystem};
    use std::io;
    use tempfile::TempDir;

    fn keys(flat: &FlatConfig) -> Vec<&str> {
        flat.keys().collect()
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a-uat.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a-uat.YML")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a-uat.toml")), Format::Toml);
        assert_eq!(Format::from_path(Path::new("a-uat.properties")), Format::Properties);
        assert_eq!(Format::from_path(Path::new("a-uat.Json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("a-uat.env")), Format::KeyValue);
        assert_eq!(Format::from_path(Path::new("a-uat")), Format::KeyValue);
    }

    #[test]
    fn test_flatten_yaml_nested() {
        let text = "db:\n  host: 10.0.0.1\n  port: 5432\nhosts:\n  - a\n  - name: b\nenabled: true\n";
        let flat = flatten_str(Format::Yaml, text).unwrap();
        assert_eq!(
            keys(&flat),
            vec!["db.host", "db.port", "enabled", "hosts[0]", "hosts[1].name"]
        );
        assert_eq!(flat.get("db.port"), Some("5432"));
        assert_eq!(flat.get("enabled"), Some("true"));
        assert_eq!(flat.get("hosts[1].name"), Some("b"));
    }

    #[test]
    fn test_flatten_yaml_non_string_keys_and_null() {
        let flat = flatten_str(Format::Yaml, "ports:\n  80: http\nmissing: ~\n").unwrap();
        assert_eq!(flat.get("ports.80"), Some("http"));
        assert_eq!(flat.get("missing"), Some("null"));
    }

    #[test]
    fn test_flatten_toml() {
        let text = "name = \"svc\"\nratio = 1.0\n\n[db]\nhost = \"10.0.0.1\"\nports = [1, 2]\n";
        let flat = flatten_str(Format::Toml, text).unwrap();
        assert_eq!(
            keys(&flat),
            vec!["db.host", "db.ports[0]", "db.ports[1]", "name", "ratio"]
        );
        assert_eq!(flat.get("ratio"), Some("1.0"));
    }

    #[test]
    fn test_flatten_json() {
        let text = r#"{"db": {"host": "10.0.0.1", "replicas": [{"host": "10.0.0.2"}]}, "ratio": 1.0}"#;
        let flat = flatten_str(Format::Json, text).unwrap();
        assert_eq!(keys(&flat), vec!["db.host", "db.replicas[0].host", "ratio"]);
        assert_eq!(flat.get("ratio"), Some("1.0"));
    }

    #[test]
    fn test_flatten_properties() {
        let text = "# comment\ndb.host=10.0.0.1\ndb.port : 5432\n";
        let flat = flatten_str(Format::Properties, text).unwrap();
        assert_eq!(flat.get("db.host"), Some("10.0.0.1"));
        assert_eq!(flat.get("db.port"), Some("5432"));
        assert_eq!(flat.len(), 2);
    }

    #[test]
    fn test_flatten_key_value_text() {
        let text = "# comment\n\n KEY = a=b \n=orphan\nnovalue\nEMPTY=\n";
        let flat = flatten_str(Format::KeyValue, text).unwrap();
        assert_eq!(flat.get("KEY"), Some("a=b"));
        assert_eq!(flat.get("EMPTY"), Some(""));
        assert_eq!(flat.len(), 2);
    }

    #[test]
    fn test_same_structure_same_keys_across_formats() {
        let yaml = "db:\n  host: 10.0.0.1\n  port: 5432\nlist:\n  - x\n";
        let toml = "list = [\"x\"]\n[db]\nhost = \"10.0.0.1\"\nport = 5432\n";
        let json = r#"{"db": {"host": "10.0.0.1", "port": 5432}, "list": ["x"]}"#;
        let props = "db.host=10.0.0.1\ndb.port=5432\nlist[0]=x\n";

        let expected = flatten_str(Format::Yaml, yaml).unwrap();
        assert_eq!(flatten_str(Format::Toml, toml).unwrap(), expected);
        assert_eq!(flatten_str(Format::Json, json).unwrap(), expected);
        assert_eq!(flatten_str(Format::Properties, props).unwrap(), expected);
    }

    #[test]
    fn test_empty_input_is_empty_config() {
        for format in [Format::Yaml, Format::Toml, Format::Json, Format::Properties, Format::KeyValue] {
            let flat = flatten_str(format, "  \n").unwrap();
            assert!(flat.is_empty(), "{} should be empty", format);
        }
    }

    #[test]
    fn test_malformed_input_is_error() {
        assert!(matches!(
            flatten_str(Format::Json, "{\"a\": "),
            Err(FlattenError::Json(_))
        ));
        assert!(matches!(
            flatten_str(Format::Toml, "a = = b"),
            Err(FlattenError::Toml(_))
        ));
        assert!(matches!(
            flatten_str(Format::Yaml, "a: [1, 2"),
            Err(FlattenError::Yaml(_))
        ));
    }

    #[test]
    fn test_scalar_root_is_error() {
        assert!(matches!(
            flatten_str(Format::Json, "42"),
            Err(FlattenError::NotAStructure)
        ));
    }

    #[test]
    fn test_sequence_root_uses_index_keys() {
        let flat = flatten_str(Format::Json, r#"["10.0.0.1", {"a": 1}]"#).unwrap();
        assert_eq!(keys(&flat), vec!["[0]", "[1].a"]);
    }

    #[test]
    fn test_addresses_deduplicated() {
        let flat = FlatConfig::from_pairs([
            ("a", "10.0.0.1"),
            ("b", "jdbc://10.0.0.1:5432,10.0.0.2"),
            ("c", "no address"),
        ]);
        let addrs: Vec<_> = flat.addresses().into_iter().collect();
        assert_eq!(addrs, vec!["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn test_flatten_file_real() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("svc-uat.yaml");
        std::fs::write(&path, "db:\n  host: 10.0.0.1\n").unwrap();
        let flat = flatten_file(real_fs(), &path).unwrap();
        assert_eq!(flat.get("db.host"), Some("10.0.0.1"));
    }

    #[test]
    fn test_flatten_file_read_error() {
        let mut mock_fs = MockFileSystem::new();
        mock_fs
            .expect_read_to_string()
            .returning(|_| Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")));
        let result = flatten_file(&mock_fs, Path::new("svc-prod.yaml"));
        assert!(matches!(result, Err(FlattenError::Read(_))));
    }
}
