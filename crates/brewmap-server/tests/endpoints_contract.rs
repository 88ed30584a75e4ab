use serde::Deserialize;
use std::collections::BTreeSet;

#[derive(Debug, Deserialize)]
struct EndpointsContract {
    endpoints: Vec<EndpointEntry>,
}

#[derive(Debug, Deserialize)]
struct EndpointEntry {
    method: String,
    path: String,
    purpose: String,
}

#[test]
fn server_routes_match_endpoints_contract() {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf();

    let contract: EndpointsContract = serde_json::from_slice(
        &std::fs::read(root.join("docs/contracts/ENDPOINTS.json")).expect("read endpoints contract"),
    )
    .expect("parse endpoints contract");

    let server_src = std::fs::read_to_string(root.join("crates/brewmap-server/src/lib.rs"))
        .expect("read server routing source");

    let route_re = regex::Regex::new(
        r#"\.route\(\s*"([^"]+)",\s*([a-z]+)\([^)]*\)(?:\s*\.([a-z]+)\([^)]*\))?"#,
    )
    .expect("route regex");
    let mut route_set = BTreeSet::new();
    for cap in route_re.captures_iter(&server_src) {
        let path = cap[1].to_string();
        route_set.insert((cap[2].to_ascii_uppercase(), path.clone()));
        if let Some(extra) = cap.get(3) {
            route_set.insert((extra.as_str().to_ascii_uppercase(), path));
        }
    }
    assert!(!route_set.is_empty(), "no routes parsed from router source");

    let mut contract_set = BTreeSet::new();
    for ep in &contract.endpoints {
        assert!(
            matches!(ep.method.as_str(), "GET" | "POST"),
            "unexpected method {} for {}",
            ep.method,
            ep.path
        );
        assert!(
            !ep.purpose.trim().is_empty(),
            "missing purpose for {} {}",
            ep.method,
            ep.path
        );
        contract_set.insert((ep.method.clone(), ep.path.clone()));
    }

    assert_eq!(route_set, contract_set, "server route registry drift");
}
