//! deps.json fixtures.
//!
//! `DepsJson` builds manifests the way the SDK writes them: a runtime
//! target, per-target library assets and a `libraries` table.

use serde_json::{json, Map, Value};

/// Target framework moniker used by every fixture
pub const TARGET_FRAMEWORK: &str = ".NETCoreApp,Version=v1.0";

/// Shared framework package every portable fixture depends on
pub const FRAMEWORK_NAME: &str = "Microsoft.NETCore.App";

/// One library in a manifest
#[derive(Debug, Clone)]
pub struct Library {
    name: String,
    version: String,
    library_type: String,
    serviceable: bool,
    sha512: String,
    runtime: Vec<String>,
    native: Vec<String>,
    resources: Vec<(String, String)>,
    runtime_targets: Vec<(String, String, String)>,
}

impl Library {
    pub fn package(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            library_type: "package".to_string(),
            serviceable: false,
            sha512: String::new(),
            runtime: Vec::new(),
            native: Vec::new(),
            resources: Vec::new(),
            runtime_targets: Vec::new(),
        }
    }

    pub fn project(name: &str, version: &str) -> Self {
        Self {
            library_type: "project".to_string(),
            ..Self::package(name, version)
        }
    }

    pub fn sha512(mut self, value: &str) -> Self {
        self.sha512 = format!("sha512-{}", value);
        self
    }

    pub fn serviceable(mut self) -> Self {
        self.serviceable = true;
        self
    }

    pub fn runtime(mut self, asset: &str) -> Self {
        self.runtime.push(asset.to_string());
        self
    }

    pub fn native(mut self, asset: &str) -> Self {
        self.native.push(asset.to_string());
        self
    }

    pub fn resource(mut self, asset: &str, locale: &str) -> Self {
        self.resources.push((asset.to_string(), locale.to_string()));
        self
    }

    /// RID-specific asset; `asset_type` is `runtime`, `native` or `resources`
    pub fn rid_asset(mut self, asset: &str, rid: &str, asset_type: &str) -> Self {
        self.runtime_targets
            .push((asset.to_string(), rid.to_string(), asset_type.to_string()));
        self
    }

    fn key(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }

    fn target_value(&self) -> Value {
        let mut target = Map::new();
        if !self.runtime.is_empty() {
            target.insert("runtime".into(), empty_objects(&self.runtime));
        }
        if !self.native.is_empty() {
            target.insert("native".into(), empty_objects(&self.native));
        }
        if !self.resources.is_empty() {
            let resources: Map<String, Value> = self
                .resources
                .iter()
                .map(|(asset, locale)| (asset.clone(), json!({ "locale": locale })))
                .collect();
            target.insert("resources".into(), Value::Object(resources));
        }
        if !self.runtime_targets.is_empty() {
            let assets: Map<String, Value> = self
                .runtime_targets
                .iter()
                .map(|(asset, rid, asset_type)| {
                    (asset.clone(), json!({ "rid": rid, "assetType": asset_type }))
                })
                .collect();
            target.insert("runtimeTargets".into(), Value::Object(assets));
        }
        Value::Object(target)
    }

    fn library_value(&self) -> Value {
        json!({
            "type": self.library_type,
            "serviceable": self.serviceable,
            "sha512": self.sha512,
        })
    }
}

fn empty_objects(assets: &[String]) -> Value {
    Value::Object(
        assets
            .iter()
            .map(|asset| (asset.clone(), json!({})))
            .collect(),
    )
}

/// Manifest builder
#[derive(Debug, Clone)]
pub struct DepsJson {
    target: String,
    libraries: Vec<Library>,
    runtimes: Vec<(String, Vec<String>)>,
}

impl DepsJson {
    /// Framework-dependent application (or the framework's own manifest)
    pub fn portable() -> Self {
        Self {
            target: TARGET_FRAMEWORK.to_string(),
            libraries: Vec::new(),
            runtimes: Vec::new(),
        }
    }

    /// Self-contained application published for `rid`
    pub fn standalone(rid: &str) -> Self {
        Self {
            target: format!("{}/{}", TARGET_FRAMEWORK, rid),
            ..Self::portable()
        }
    }

    pub fn library(mut self, library: Library) -> Self {
        self.libraries.push(library);
        self
    }

    /// RID fallback graph entry (`runtimes` section)
    pub fn runtime_graph(mut self, rid: &str, fallbacks: &[&str]) -> Self {
        self.runtimes.push((
            rid.to_string(),
            fallbacks.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    pub fn render(&self) -> String {
        let targets: Map<String, Value> = self
            .libraries
            .iter()
            .map(|lib| (lib.key(), lib.target_value()))
            .collect();
        let libraries: Map<String, Value> = self
            .libraries
            .iter()
            .map(|lib| (lib.key(), lib.library_value()))
            .collect();

        let mut by_target = Map::new();
        by_target.insert(self.target.clone(), Value::Object(targets));

        let mut doc = json!({
            "runtimeTarget": { "name": self.target },
            "targets": by_target,
            "libraries": libraries,
        });
        if !self.runtimes.is_empty() {
            let runtimes: Map<String, Value> = self
                .runtimes
                .iter()
                .map(|(rid, fallbacks)| (rid.clone(), json!(fallbacks)))
                .collect();
            doc["runtimes"] = Value::Object(runtimes);
        }
        serde_json::to_string_pretty(&doc).expect("fixture serializes")
    }
}
