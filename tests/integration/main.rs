//! Integration tests for swcache

use std::fs;
use std::path::Path;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

const POLICY: &str = r#"
[caching.versioning]
auto_version = true

[caching.dependencies]
enabled = true
tracked_files = ["dist/**/*.js", "dist/**/*.css"]

[caching.invalidation]
ignore_patterns = ["**/*.map"]

[[caching.routes]]
pattern = "*.js"
strategy = { name = "StaleWhileRevalidate", cache_name = "scripts" }

[[caching.routes]]
pattern = "/special/*.js"
priority = 10
strategy = { name = "CacheFirst", cache_name = "special" }

[[caching.routes]]
pattern = "/api/**"
priority = 5
dependencies = ["/config.json"]
strategy = { name = "NetworkFirst", cache_name = "api", network_timeout_seconds = 3 }

[[caching.routes]]
pattern = "/pages/**"
dependencies = ["/api/**"]
strategy = { name = "StaleWhileRevalidate", cache_name = "pages" }

[[caching.routes]]
pattern = "/config.json"
strategy = { name = "NetworkOnly", cache_name = "config" }
"#;

mod cli_tests {
    use super::*;
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn swcache() -> Command {
        cargo_bin_cmd!("swcache")
    }

    /// Project with a local config and a small built site
    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        write(temp.path(), ".swcache.toml", POLICY);
        write(temp.path(), "dist/app.js", "console.log(1);");
        write(temp.path(), "dist/css/style.css", "body {}");
        write(temp.path(), "dist/app.js.map", "{}");
        temp
    }

    fn in_project(temp: &TempDir) -> Command {
        let mut cmd = swcache();
        cmd.arg("--project").arg(temp.path());
        cmd
    }

    #[test]
    fn help_displays() {
        swcache()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Service worker caching policy").or(
                predicate::str::contains("service worker caching policy"),
            ));
    }

    #[test]
    fn version_flag_displays() {
        swcache()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("swcache"));
    }

    #[test]
    fn version_is_stable_and_written() {
        let temp = project();

        let first = in_project(&temp).arg("version").output().unwrap();
        let second = in_project(&temp).arg("version").output().unwrap();
        assert!(first.status.success());
        assert_eq!(first.stdout, second.stdout);
        assert!(String::from_utf8_lossy(&first.stdout).contains("2 tracked file(s)"));

        in_project(&temp).args(["version", "--write"]).assert().success();
        assert!(temp.path().join(".swcache-version.json").is_file());
    }

    #[test]
    fn check_without_stored_version_fails_with_hint() {
        let temp = project();
        in_project(&temp)
            .arg("check")
            .assert()
            .failure()
            .stderr(predicate::str::contains("No stored cache version"))
            .stderr(predicate::str::contains("swcache version --write"));
    }

    #[test]
    fn check_detects_edits_and_updates() {
        let temp = project();
        in_project(&temp).args(["version", "--write"]).assert().success();

        in_project(&temp)
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("No tracked file changes"));

        // Source maps are ignored
        write(temp.path(), "dist/app.js.map", "{\"changed\": true}");
        in_project(&temp)
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("Keep:"));

        write(temp.path(), "dist/app.js", "console.log(2);");
        in_project(&temp)
            .args(["check", "--update"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Tracked files changed"))
            .stdout(predicate::str::contains("app.js"));

        in_project(&temp)
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("No tracked file changes"));
    }

    #[test]
    fn tracked_version_file_settles_after_update() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            ".swcache.toml",
            "[caching.versioning]\nauto_version = true\n\n\
             [caching.dependencies]\nenabled = true\ntracked_files = [\"**/*.json\", \"*.json\"]\n",
        );
        write(temp.path(), "manifest.json", "{}");

        in_project(&temp).args(["version", "--write"]).assert().success();
        for _ in 0..3 {
            in_project(&temp)
                .args(["check", "--update"])
                .assert()
                .success()
                .stdout(predicate::str::contains("No tracked file changes"))
                .stdout(predicate::str::contains(".swcache-version.json").not());
        }

        write(temp.path(), "manifest.json", "{\"v\": 2}");
        in_project(&temp)
            .args(["check", "--update"])
            .assert()
            .success()
            .stdout(predicate::str::contains("manifest.json"));
        in_project(&temp)
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("No tracked file changes"));
    }

    #[test]
    fn check_json_output() {
        let temp = project();
        in_project(&temp).args(["version", "--write"]).assert().success();
        write(temp.path(), "dist/new.js", "new");

        let output = in_project(&temp).args(["check", "--format", "json"]).output().unwrap();
        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["shouldInvalidate"], true);
        assert_eq!(json["reason"], "Tracked files changed");
        assert!(json["changedFiles"][0].as_str().unwrap().ends_with("new.js"));
    }

    #[test]
    fn match_prefers_priority() {
        let temp = project();
        in_project(&temp)
            .args(["match", "https://example.com/special/app.js?v=3"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Best match: /special/*.js -> CacheFirst (special)"));
    }

    #[test]
    fn match_reports_no_route() {
        let temp = project();
        in_project(&temp)
            .args(["match", "/unknown/page"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No route matches"));
    }

    #[test]
    fn cascade_follows_dependents() {
        let temp = project();
        let output = in_project(&temp)
            .args(["cascade", "/config.json", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let mut routes: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
        routes.sort();
        assert_eq!(routes, ["/api/**", "/config.json", "/pages/**"]);
    }

    #[test]
    fn cascade_unknown_route_fails() {
        let temp = project();
        in_project(&temp)
            .args(["cascade", "/nope"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Route not found: /nope"));
    }

    #[test]
    fn sw_config_for_backend() {
        let temp = project();
        let output = in_project(&temp)
            .args(["sw-config", "--backend", "django", "--destination", "static/sw.js"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["destination"], "static/sw.js");
        assert_eq!(json["imageRoutes"][0]["pattern"], "/media/**");
        assert_eq!(json["features"]["clientsClaim"], true);
    }

    #[test]
    fn sw_config_unknown_backend() {
        let temp = project();
        in_project(&temp)
            .args(["sw-config", "--backend", "rails"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown backend integration: rails"))
            .stderr(predicate::str::contains("Supported backends"));
    }

    #[test]
    fn validate_passes_for_project() {
        let temp = project();
        in_project(&temp)
            .arg("validate")
            .assert()
            .success()
            .stdout(predicate::str::contains("5 route(s) configured"))
            .stdout(predicate::str::contains("public/sw.js"));
    }

    #[test]
    fn validate_rejects_empty_destination() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), ".swcache.toml", "[service_worker]\ndestination = \"\"\n");
        in_project(&temp)
            .arg("validate")
            .assert()
            .failure()
            .stdout(predicate::str::contains("destination is required"));
    }

    #[test]
    fn invalid_strategy_rejected_on_load() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            ".swcache.toml",
            "[[caching.routes]]\npattern = \"/x\"\nstrategy = { name = \"Fastest\", cache_name = \"x\" }\n",
        );
        in_project(&temp)
            .args(["match", "/x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Route 0: unknown strategy 'Fastest'"));
    }

    #[test]
    fn explicit_config_must_exist() {
        let temp = project();
        in_project(&temp)
            .args(["--config", "missing.toml", "validate"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Configuration file not found"));
    }
}

mod scenarios {
    use super::*;
    use swcache::config::{AdvancedCachingConfig, Config};
    use swcache::dependency::{build_dependency_graph, get_cascade_invalidation};
    use swcache::routing::{deduplicate, find_best_match, CachingStrategy, RouteConfig};
    use swcache::version::{
        generate_cache_version, should_invalidate_cache, CacheVersion, InvalidationReason,
    };
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn globs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn policy() -> AdvancedCachingConfig {
        let config: Config = toml::from_str(POLICY).unwrap();
        config.caching
    }

    fn site() -> TempDir {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "dist/app.js", "console.log(1);");
        write(temp.path(), "dist/style.css", "body {}");
        write(temp.path(), "dist/app.js.map", "{}");
        write(temp.path(), "src/main.ts", "let x = 1;");
        temp
    }

    #[test]
    fn static_site_rebuild() {
        let temp = site();
        let config = policy();
        let tracked = &config.dependencies.tracked_files;
        let ignore = &config.invalidation.ignore_patterns;

        let initial = generate_cache_version(temp.path(), tracked, ignore);
        assert_eq!(initial.file_hashes.len(), 2);
        assert_eq!(generate_cache_version(temp.path(), tracked, ignore).version, initial.version);

        let app = temp.path().join("dist/app.js");
        fs::write(&app, "console.log(2);").unwrap();
        assert_ne!(generate_cache_version(temp.path(), tracked, ignore).version, initial.version);

        let result = should_invalidate_cache(temp.path(), &initial, &config);
        assert!(result.should_invalidate);
        assert_eq!(result.reason, InvalidationReason::FilesChanged);
        assert_eq!(
            result.changed_files.unwrap(),
            [app.to_string_lossy().into_owned()]
        );
    }

    #[test]
    fn ignored_source_maps() {
        let temp = site();
        let mut config = policy();
        config.dependencies.tracked_files = globs(&["dist/**/*.js"]);
        let tracked = &config.dependencies.tracked_files;
        let ignore = &config.invalidation.ignore_patterns;

        let before = generate_cache_version(temp.path(), tracked, ignore);
        fs::write(temp.path().join("dist/app.js.map"), "{\"v\": 2}").unwrap();
        let after = generate_cache_version(temp.path(), tracked, ignore);
        assert_eq!(before.version, after.version);

        let result = should_invalidate_cache(temp.path(), &before, &config);
        assert!(!result.should_invalidate);
        assert_eq!(result.reason, InvalidationReason::NoFileChanges);
    }

    #[test]
    fn deletion_detected() {
        let temp = site();
        let config = policy();
        let tracked = &config.dependencies.tracked_files;

        let before = generate_cache_version(temp.path(), tracked, &[]);
        fs::remove_file(temp.path().join("dist/style.css")).unwrap();
        let after = generate_cache_version(temp.path(), tracked, &[]);

        assert_ne!(before.version, after.version);
        assert_eq!(after.file_hashes.len(), before.file_hashes.len() - 1);
    }

    #[test]
    fn manual_bump() {
        let temp = site();
        let mut config = policy();
        config.versioning.manual_version = Some("v1.1.0".to_string());

        // Tracked files changed too, but the manual version decides alone
        let stored = CacheVersion::manual("v1.0.0");
        fs::write(temp.path().join("dist/app.js"), "changed").unwrap();

        let result = should_invalidate_cache(temp.path(), &stored, &config);
        assert!(result.should_invalidate);
        assert_eq!(result.reason.as_str(), "Manual version changed");
        assert_eq!(result.new_version.as_deref(), Some("v1.1.0"));
        assert!(result.changed_files.is_none());

        let same = should_invalidate_cache(temp.path(), &CacheVersion::manual("v1.1.0"), &config);
        assert!(!same.should_invalidate);
    }

    #[test]
    fn empty_tracked_set_is_a_valid_version() {
        let temp = site();
        let version = generate_cache_version(temp.path(), &globs(&["nothing/**/*.bin"]), &[]);
        assert_eq!(version.version.len(), 12);
        assert!(version.file_hashes.is_empty());
    }

    #[test]
    fn cascade_chain_and_cycle() {
        let strategy = CachingStrategy::cache_first("c");
        let chain = vec![
            RouteConfig::new("A", strategy.clone()).with_dependencies(["B"]),
            RouteConfig::new("B", strategy.clone()).with_dependencies(["C"]),
            RouteConfig::new("C", strategy.clone()),
        ];
        let got: HashSet<String> =
            get_cascade_invalidation("C", &build_dependency_graph(&chain)).into_iter().collect();
        assert_eq!(got, HashSet::from(["A".into(), "B".into(), "C".into()]));

        let cycle = vec![
            RouteConfig::new("A", strategy.clone()).with_dependencies(["B"]),
            RouteConfig::new("B", strategy).with_dependencies(["A"]),
        ];
        let got: HashSet<String> =
            get_cascade_invalidation("A", &build_dependency_graph(&cycle)).into_iter().collect();
        assert_eq!(got, HashSet::from(["A".into(), "B".into()]));
    }

    #[test]
    fn priority_ordering_and_dedup() {
        let routes = policy().routes;
        let best = find_best_match("/special/app.js", &routes).unwrap();
        assert_eq!(best.priority, 10);

        let mut doubled = routes.clone();
        doubled.extend(routes.iter().cloned());
        let once = deduplicate(&doubled);
        assert_eq!(once.len(), routes.len());
        assert_eq!(deduplicate(&once), once);
    }
}
