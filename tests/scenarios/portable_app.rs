//! Scenario: Framework-Dependent Application
//!
//! Journey: A developer builds an application against the shared framework
//! and asks what the host would hand the runtime.
//!
//! Steps:
//! 1. The app directory holds the app assembly and its deps.json
//! 2. NuGet packages live in a hash-verified package cache
//! 3. The shared framework directory holds its own manifest and the runtime loader
//! 4. User runs `depsprobe resolve`
//!
//! Success Criteria:
//! - Each assembly is found where the manifests say it lives
//! - The runtime loader directory is the framework directory
//! - Resource directories put the app directory ahead of the framework

use crate::common::*;
use crate::{assert_listed_before, assert_output_contains};

const NEWTONSOFT_DLL: &str = "lib/netstandard1.0/Newtonsoft.Json.dll";

/// App with a project, a cached package and a framework reference
fn app_manifest() -> DepsJson {
    DepsJson::portable()
        .library(Library::project("App", "1.0.0").runtime("App.dll"))
        .library(
            Library::package("Newtonsoft.Json", "9.0.1")
                .sha512("abc")
                .runtime(NEWTONSOFT_DLL),
        )
        .library(Library::package(FRAMEWORK_NAME, "1.0.0"))
}

/// Flat framework: assemblies next to the manifest, loader included
fn install_framework(env: &TestEnv) {
    let manifest = DepsJson::portable()
        .library(
            Library::package("System.Runtime", "4.1.0")
                .runtime("lib/netstandard1.5/System.Runtime.dll"),
        )
        .library(
            Library::package("Microsoft.NETCore.Runtime.CoreCLR", "1.0.2")
                .native(&format!("runtimes/linux-x64/native/{}", loader_file_name())),
        );
    env.write("fx/Microsoft.NETCore.App.deps.json", &manifest.render());
    env.touch("fx/System.Runtime.dll");
    env.install_loader("fx");
}

fn cache_newtonsoft(env: &TestEnv, sidecar: &str) {
    env.touch(&format!("cache/Newtonsoft.Json/9.0.1/{}", NEWTONSOFT_DLL));
    env.write(
        "cache/Newtonsoft.Json/9.0.1/Newtonsoft.Json.9.0.1.nupkg.sha512",
        sidecar,
    );
}

fn resolve_args(env: &TestEnv, extra: &[&str]) -> Vec<String> {
    let mut args = vec![
        "resolve".to_string(),
        "--app-dir".to_string(),
        env.path("app").display().to_string(),
        "--fx-dir".to_string(),
        env.path("fx").display().to_string(),
        "--package-cache".to_string(),
        env.path("cache").display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    args
}

fn run(env: &TestEnv, extra: &[&str]) -> TestResult {
    let args = resolve_args(env, extra);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    env.run(&args)
}

/// SCENARIO: every assembly resolves to its owning location
#[test]
fn scenario_portable_app_resolves_against_shared_framework() {
    let env = TestEnv::new();
    env.write("app/App.deps.json", &app_manifest().render());
    env.touch("app/App.dll");
    env.touch("app/Newtonsoft.Json.dll");
    cache_newtonsoft(&env, "abc");
    install_framework(&env);

    let result = run(&env, &["--json"]);
    assert!(result.success, "resolve failed:\n{}", result.combined_output());

    let json = result.json();
    assert_eq!(json["portable"], true);
    assert_eq!(json["clr_dir"], env.path("fx").display().to_string());
    assert_eq!(
        json_strings(&json, "tpa"),
        display(&[
            env.path("app/App.dll"),
            env.path(&format!("cache/Newtonsoft.Json/9.0.1/{}", NEWTONSOFT_DLL)),
            env.path("fx/System.Runtime.dll"),
        ])
    );

    // The loader entry's directory comes first, then the app directory.
    let native = json_strings(&json, "native");
    assert_eq!(native, display(&[env.path("fx"), env.path("app")]));
    let resources = json_strings(&json, "resources");
    assert_eq!(resources, display(&[env.path("app"), env.path("fx")]));
}

/// SCENARIO: a package whose cache sidecar disagrees is taken from a probe dir
#[test]
fn scenario_hash_mismatch_falls_through_to_probe_directory() {
    let env = TestEnv::new();
    env.write("app/App.deps.json", &app_manifest().render());
    env.touch("app/App.dll");
    cache_newtonsoft(&env, "tampered");
    env.touch(&format!("probe/Newtonsoft.Json/9.0.1/{}", NEWTONSOFT_DLL));
    install_framework(&env);

    let probe = env.path("probe").display().to_string();
    let result = run(&env, &["--probe", probe.as_str(), "--json"]);
    assert!(result.success, "resolve failed:\n{}", result.combined_output());

    let tpa = json_strings(&result.json(), "tpa");
    let probed = env
        .path(&format!("probe/Newtonsoft.Json/9.0.1/{}", NEWTONSOFT_DLL))
        .display()
        .to_string();
    let cache = env.path("cache").display().to_string();
    assert!(
        tpa.contains(&probed),
        "expected probe copy in TPA:\n  {}",
        tpa.join("\n  ")
    );
    assert!(!tpa.iter().any(|p| p.starts_with(&cache)));
}

/// SCENARIO: RID-specific native assets are chosen for the requested RID
#[test]
fn scenario_native_assets_follow_requested_rid() {
    let env = TestEnv::new();
    let manifest = app_manifest().library(
        Library::package("runtime.native.System", "4.0.0")
            .sha512("n4t")
            .rid_asset("runtimes/linux-x64/native/System.Native.so", "linux-x64", "native")
            .rid_asset("runtimes/osx/native/System.Native.dylib", "osx", "native"),
    );
    env.write("app/App.deps.json", &manifest.render());
    env.touch("app/App.dll");
    cache_newtonsoft(&env, "abc");
    env.touch("cache/runtime.native.System/4.0.0/runtimes/linux-x64/native/System.Native.so");
    env.touch("cache/runtime.native.System/4.0.0/runtimes/osx/native/System.Native.dylib");
    env.write(
        "cache/runtime.native.System/4.0.0/runtime.native.System.4.0.0.nupkg.sha512",
        "n4t",
    );
    install_framework(&env);

    let result = run(&env, &["--rid", "linux-x64", "--json"]);
    assert!(result.success, "resolve failed:\n{}", result.combined_output());

    let native = json_strings(&result.json(), "native");
    let linux = env
        .path("cache/runtime.native.System/4.0.0/runtimes/linux-x64/native")
        .display()
        .to_string();
    assert_eq!(native.first(), Some(&linux));
    assert_listed_before!(native, linux, env.path("app").display().to_string());
    let osx = env
        .path("cache/runtime.native.System/4.0.0/runtimes/osx/native")
        .display()
        .to_string();
    assert!(!native.contains(&osx));
}

/// SCENARIO: the text report names every section with its size
#[test]
fn scenario_text_report_lists_each_section() {
    let env = TestEnv::new();
    env.write("app/App.deps.json", &app_manifest().render());
    env.touch("app/App.dll");
    cache_newtonsoft(&env, "abc");
    install_framework(&env);

    let result = run(&env, &[]);
    assert!(result.success, "resolve failed:\n{}", result.combined_output());

    assert_output_contains!(result, "Mode: portable (shared framework)");
    assert_output_contains!(result, "Trusted platform assemblies (3):");
    assert_output_contains!(result, "Resource search directories (2):");
    assert_output_contains!(
        result,
        &format!("Runtime loader directory: {}", env.path("fx").display())
    );
}
