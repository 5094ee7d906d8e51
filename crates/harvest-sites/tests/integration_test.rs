use harvest_sites::{SiteLoader, SiteRegistry, PUBLISHERS_RULE};
use tempfile::TempDir;

const OVERRIDE_RULE: &str = r#"
label = "Publishers"

[[sites]]
label = "Cureus"
hosts = ["cureus.com"]
base_url = "https://www.cureus.com/"
search_url_template = "https://www.cureus.com/articles?q={query}"
"#;

const EXTRA_RULE: &str = r#"
label = "Preprints"

[[sites]]
label = "bioRxiv"
hosts = ["biorxiv.org"]
base_url = "https://www.biorxiv.org/"

[[sites]]
label = "arXiv"
hosts = ["arxiv.org", "export.arxiv.org"]
base_url = "https://arxiv.org/"
"#;

#[test]
fn test_user_rules_merge_over_builtin() {
    let temp_dir = TempDir::new().expect("create temp dir");
    std::fs::write(temp_dir.path().join("publishers.toml"), OVERRIDE_RULE).expect("write rule");
    std::fs::write(temp_dir.path().join("preprints.toml"), EXTRA_RULE).expect("write rule");

    let registry = SiteRegistry::builtin();
    let loader = SiteLoader::new(temp_dir.path()).expect("create loader");
    let merged = registry.merge_from(&loader).expect("merge rules");

    assert_eq!(merged, 2);
    assert_eq!(registry.count(), 2);

    let publishers = registry.sites_for_rule(PUBLISHERS_RULE).expect("publishers");
    assert_eq!(publishers.len(), 1);
    assert_eq!(
        publishers[0].search_url("sepsis"),
        Some("https://www.cureus.com/articles?q=sepsis".to_string())
    );

    let arxiv = registry.site("arXiv").expect("arxiv site");
    assert_eq!(arxiv.allowed_hosts(), vec!["arxiv.org", "export.arxiv.org"]);
}

#[test]
fn test_load_from_directory_only() {
    let temp_dir = TempDir::new().expect("create temp dir");
    std::fs::write(temp_dir.path().join("preprints.toml"), EXTRA_RULE).expect("write rule");

    let loader = SiteLoader::new(temp_dir.path()).expect("create loader");
    let registry = SiteRegistry::load_from(&loader).expect("load registry");

    assert_eq!(registry.count(), 1);
    assert!(!registry.contains(PUBLISHERS_RULE));
    assert!(registry.site("bioRxiv").is_ok());
}
