//! Scenario: Self-Contained Application
//!
//! Journey: A developer publishes an application together with the runtime
//! and checks that the host finds everything inside the app directory.
//!
//! Steps:
//! 1. The app directory holds the app, its dependencies and the runtime loader
//! 2. The manifest targets a specific RID
//! 3. User runs `depsprobe resolve`
//!
//! Success Criteria:
//! - The runtime loader directory is the app directory
//! - Assemblies not named by the manifest are still trusted
//! - A missing runtime loader is a clear failure with exit code 1

use crate::assert_output_contains;
use crate::common::*;

fn standalone_manifest() -> DepsJson {
    DepsJson::standalone("linux-x64")
        .library(Library::project("App", "1.0.0").runtime("App.dll"))
        .library(
            Library::package("System.Private.CoreLib", "4.0.0")
                .runtime("runtimes/linux-x64/lib/netstandard1.0/System.Private.CoreLib.dll"),
        )
        .library(
            Library::package("runtime.linux-x64.Microsoft.NETCore.Runtime.CoreCLR", "1.0.2")
                .native(&format!("runtimes/linux-x64/native/{}", loader_file_name())),
        )
}

/// Published layout: everything flattened into the app directory
fn publish(env: &TestEnv) {
    env.write("app/App.deps.json", &standalone_manifest().render());
    env.touch("app/App.dll");
    env.touch("app/System.Private.CoreLib.dll");
}

fn resolve(env: &TestEnv, extra: &[&str]) -> TestResult {
    let app = env.path("app").display().to_string();
    let mut args = vec!["resolve", "--app-dir", app.as_str()];
    args.extend_from_slice(extra);
    env.run(&args)
}

/// SCENARIO: everything resolves from the app directory
#[test]
fn scenario_standalone_app_resolves_from_app_dir() {
    let env = TestEnv::new();
    publish(&env);
    env.install_loader("app");
    env.touch("app/Plugin.dll");
    env.touch("app/Tool.dll");
    env.touch("app/Tool.ni.dll");
    env.touch("app/readme.txt");

    let result = resolve(&env, &["--json"]);
    assert!(result.success, "resolve failed:\n{}", result.combined_output());

    let json = result.json();
    assert_eq!(json["portable"], false);
    assert_eq!(json["clr_dir"], env.path("app").display().to_string());
    assert_eq!(
        json_strings(&json, "tpa"),
        display(&[
            env.path("app/App.dll"),
            env.path("app/System.Private.CoreLib.dll"),
            env.path("app/Plugin.dll"),
            env.path("app/Tool.ni.dll"),
        ])
    );
    assert_eq!(json_strings(&json, "native"), display(&[env.path("app")]));
    assert_eq!(json_strings(&json, "resources"), display(&[env.path("app")]));
}

/// SCENARIO: the joined lists carry a separator after every entry
#[test]
fn scenario_joined_paths_end_with_separator() {
    let env = TestEnv::new();
    publish(&env);
    env.install_loader("app");

    let result = resolve(&env, &["--json"]);
    assert!(result.success, "resolve failed:\n{}", result.combined_output());

    let json = result.json();
    let separator = depsprobe::domain::value_objects::PATH_LIST_SEPARATOR;
    let expected: String = json_strings(&json, "tpa")
        .iter()
        .map(|p| format!("{}{}", p, separator))
        .collect();
    assert_eq!(json["paths"]["tpa"], expected);
    assert_eq!(
        json["paths"]["native"],
        format!("{}{}", env.path("app").display(), separator)
    );
}

/// SCENARIO: the loader is taken from an installed shared framework
#[test]
fn scenario_loader_found_in_install_location() {
    let env = TestEnv::new();
    publish(&env);
    env.install_loader("dotnet/shared/Microsoft.NETCore.App/1.0.5");
    env.install_loader("dotnet/shared/Microsoft.NETCore.App/1.1.0");
    env.mkdir("dotnet/shared/Microsoft.NETCore.App/1.2.0");

    let dotnet = env.path("dotnet").display().to_string();
    let app = env.path("app").display().to_string();
    let result = env.run_with_env(
        &["resolve", "--app-dir", app.as_str(), "--json"],
        &[("DEPSPROBE_INSTALL_LOCATIONS", dotnet.as_str())],
    );
    assert!(result.success, "resolve failed:\n{}", result.combined_output());

    assert_eq!(
        result.json()["clr_dir"],
        env.path("dotnet/shared/Microsoft.NETCore.App/1.1.0")
            .display()
            .to_string()
    );
}

/// SCENARIO: no runtime loader anywhere is an error
#[test]
fn scenario_missing_runtime_loader_fails() {
    let env = TestEnv::new();
    publish(&env);

    let result = resolve(&env, &[]);

    assert!(!result.success, "resolve should fail:\n{}", result.stdout);
    assert_eq!(result.exit_code, 1);
    assert_output_contains!(result, "not found for application");
    assert_output_contains!(result, loader_file_name());
    assert!(result.stdout.is_empty(), "nothing printed on failure:\n{}", result.stdout);
}

/// SCENARIO: a project config file supplies the package cache
#[test]
fn scenario_project_config_file_is_honored() {
    let env = TestEnv::new();
    let manifest = standalone_manifest().library(
        Library::package("Lib", "2.0.0")
            .sha512("c0ffee")
            .runtime("lib/netstandard1.0/Lib.dll"),
    );
    env.write("app/App.deps.json", &manifest.render());
    env.touch("app/App.dll");
    env.touch("app/System.Private.CoreLib.dll");
    env.install_loader("app");
    let lib = env.touch("store/Lib/2.0.0/lib/netstandard1.0/Lib.dll");
    env.write("store/Lib/2.0.0/Lib.2.0.0.nupkg.sha512", "c0ffee");
    env.write(
        "depsprobe.toml",
        &format!(
            "[paths]\npackage_cache = '{}'\n\n[resolution]\nrol_forward = false\n",
            env.path("store").display()
        ),
    );

    let result = resolve(&env, &["--json"]);
    assert!(result.success, "resolve failed:\n{}", result.combined_output());

    let tpa = json_strings(&result.json(), "tpa");
    assert!(
        tpa.contains(&lib.display().to_string()),
        "expected cached Lib in TPA:\n  {}",
        tpa.join("\n  ")
    );
    assert!(
        result.stderr.contains("unknown config key 'rol_forward'"),
        "expected a warning for the misspelled key:\n{}",
        result.stderr
    );
}
