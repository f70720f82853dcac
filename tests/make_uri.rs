use std::collections::HashMap;

use uritree::{BasicController, Controller, Router, RouterError};

fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

fn catalog_router() -> Router<BasicController<&'static str>> {
    let mut router = Router::new();
    router
        .add_route("/catalog/toys/", BasicController::new("CTRL-1", "ctrl1"))
        .unwrap();
    router
        .add_route(
            "/catalog/toys/cars/{make}/mymodel-{model-x}-item/id-{id}.html",
            BasicController::new("CTRL-3", "ctrl3"),
        )
        .unwrap();
    router
        .add_route(
            "/catalog/toys/cars/{id:widget-([0-9]+)(green|red)}/{year:([0-9]{4})}",
            BasicController::new("CTRL-4", "ctrl4"),
        )
        .unwrap();
    router
}

#[test]
fn reconstructs_full_uri_from_params() {
    let router = catalog_router();
    let route = router.get_route_match_by_controller_id("ctrl3").unwrap();

    let uri = router
        .make_uri(
            route.node_id,
            &values(&[("make", "honda"), ("model-x", "crv"), ("id", "12345")]),
        )
        .unwrap();

    assert_eq!(uri, "/catalog/toys/cars/honda/mymodel-crv-item/id-12345.html");
}

#[test]
fn generated_uri_round_trips_through_find_route() {
    let router = catalog_router();
    let route = router.get_route_match_by_controller_id("ctrl4").unwrap();

    let uri = router
        .make_uri(
            route.node_id,
            &values(&[("id", "widget-678red"), ("year", "2015")]),
        )
        .unwrap();
    assert_eq!(uri, "/catalog/toys/cars/widget-678red/2015");

    let matched = router.find_route(&uri).unwrap();
    assert_eq!(matched.node_id, route.node_id);
    assert_eq!(matched.controller.id(), "ctrl4");
}

#[test]
fn missing_param_value_is_rejected_with_code() {
    let router = catalog_router();
    let route = router.get_route_match_by_controller_id("ctrl3").unwrap();

    let err = router
        .make_uri(route.node_id, &values(&[("make", "honda"), ("id", "12345")]))
        .unwrap_err();
    assert!(matches!(err, RouterError::MakeUriMissingParam { .. }));
    assert_eq!(err.code(), 1_000_004);
}

#[test]
fn value_failing_pattern_is_rejected_with_code() {
    let router = catalog_router();
    let route = router.get_route_match_by_controller_id("ctrl4").unwrap();

    let err = router
        .make_uri(
            route.node_id,
            &values(&[("id", "widget-678blue"), ("year", "2015")]),
        )
        .unwrap_err();
    assert!(matches!(err, RouterError::MakeUriRegexFail { .. }));
    assert_eq!(err.code(), 1_000_005);
}

#[test]
fn catch_all_uri_uses_value_verbatim() {
    let mut router = Router::new();
    let node = router
        .add_route("/files/**path", BasicController::new((), "files"))
        .unwrap();

    let uri = router
        .make_uri(node, &values(&[("path", "docs/guide/intro.html")]))
        .unwrap();
    assert_eq!(uri, "/files/docs/guide/intro.html");
}

#[test]
fn reconstructs_route_templates() {
    let router = catalog_router();

    let plain = router.get_route_match_by_controller_id("ctrl3").unwrap();
    assert_eq!(
        router.uri_template(plain.node_id),
        "/catalog/toys/cars/{make}/mymodel-{model-x}-item/id-{id}.html"
    );

    let regex = router.get_route_match_by_controller_id("ctrl4").unwrap();
    assert_eq!(
        router.uri_template(regex.node_id),
        "/catalog/toys/cars/{id:widget-([0-9]+)(green|red)}/{year:([0-9]{4})}"
    );
}

#[test]
fn lookup_by_controller_id() {
    let router = catalog_router();

    let route = router.get_route_match_by_controller_id("ctrl1").unwrap();
    assert_eq!(route.controller.payload, "CTRL-1");
    assert_eq!(route.node.name(), "ExactMatchNode::toys/");

    let err = router
        .get_route_match_by_controller_id("missing")
        .unwrap_err();
    assert!(matches!(err, RouterError::ControllerNotFound { .. }));
    assert_eq!(err.code(), 1_000_008);
}
