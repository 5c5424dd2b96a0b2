//! URL routing through the public API.

use std::sync::{Arc, Mutex};

use overlay_router::config::parse_config;
use overlay_router::routing::{RouteMatcher, RouteOptions, Variables};
use tokio::sync::mpsc;
use url::Url;

type Seen = Arc<Mutex<Vec<(String, Variables)>>>;

fn recorder(seen: &Seen, tag: &str, answer: bool) -> impl Fn(&Url, &Variables, &RouteOptions) -> bool + Send + Sync {
    let seen = seen.clone();
    let tag = tag.to_string();
    move |_: &Url, vars: &Variables, _: &RouteOptions| {
        seen.lock().unwrap().push((tag.clone(), vars.clone()));
        answer
    }
}

#[test]
fn test_path_variable_extraction() {
    let seen = Seen::default();
    let mut matcher = RouteMatcher::new();
    matcher.add(recorder(&seen, "edit", true), "scheme://host/!id!/edit");

    assert!(matcher.route("scheme://host/42/edit", &RouteOptions::new()));
    assert!(!matcher.route("scheme://host/42/delete", &RouteOptions::new()));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].1.get("id").map(String::as_str), Some("42"));
}

#[test]
fn test_host_matching() {
    let seen = Seen::default();
    let mut matcher = RouteMatcher::new();
    matcher.add(recorder(&seen, "bare", true), "https://example.com/home");

    assert!(matcher.route("https://example.com/home", &RouteOptions::new()));
    assert!(matcher.route("https://www.example.com/home", &RouteOptions::new()));
    assert!(!matcher.route("https://other.com/home", &RouteOptions::new()));

    let mut www_only = RouteMatcher::new();
    www_only.add(recorder(&seen, "www", true), "https://www.example.com/home");
    assert!(!www_only.route("https://example.com/home", &RouteOptions::new()));
}

#[test]
fn test_segment_count_mismatch_rejects() {
    let seen = Seen::default();
    let mut matcher = RouteMatcher::new();
    matcher.add(recorder(&seen, "ab", true), "app://h/a/b");
    matcher.add(recorder(&seen, "vars", true), "app://h/!x!/!y!");

    assert!(!matcher.route("app://h/a/b/c", &RouteOptions::new()));
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_insertion_order_after_add_and_remove() {
    let seen = Seen::default();
    let mut matcher = RouteMatcher::new();
    matcher.add(recorder(&seen, "one", false), "app://h/!id!");
    matcher.add(recorder(&seen, "two", true), "app://h/!key!");
    matcher.add(recorder(&seen, "three", true), "app://h/!id!");

    assert!(matcher.route("app://h/5", &RouteOptions::new()));
    matcher.remove("app://h/!key!");
    assert!(matcher.route("app://h/6", &RouteOptions::new()));

    let tags: Vec<String> = seen.lock().unwrap().iter().map(|(t, _)| t.clone()).collect();
    assert_eq!(tags, vec!["one", "two", "one", "three"]);
}

#[test]
fn test_routes_from_config() {
    let config = parse_config(
        r#"
        [[routes]]
        name = "maintenance"
        pattern = "https://shop.example/item/!sku!"
        enabled = false

        [[routes]]
        name = "item"
        pattern = "https://shop.example/item/!sku!"

        [[routes]]
        name = "review"
        pattern = "https://shop.example/item/!sku!/reviews/!page!"
        "#,
    )
    .unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let matcher = RouteMatcher::from_config(&config.routes, tx);

    let mut options = RouteOptions::new();
    options.insert("source".into(), "email".into());

    assert!(matcher.route("https://www.shop.example/item/A-1/reviews/3", &options));
    let dispatch = rx.try_recv().unwrap();
    assert_eq!(dispatch.route, "review");
    assert_eq!(dispatch.variables["sku"], "A-1");
    assert_eq!(dispatch.variables["page"], "3");
    assert_eq!(dispatch.options["source"], "email");

    assert!(matcher.route("https://shop.example/item/B-2", &RouteOptions::new()));
    assert_eq!(rx.try_recv().unwrap().route, "item");
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_urls_compared_as_written() {
    let seen = Seen::default();
    let mut matcher = RouteMatcher::new();
    matcher.add(recorder(&seen, "scheme", true), "MyApp://host/a");
    matcher.add(recorder(&seen, "host", true), "https://Example.com/a");
    matcher.add(recorder(&seen, "literal", true), "app://h/a/b");
    matcher.add(recorder(&seen, "slots", true), "app://h/!x!/!y!/!z!");

    assert!(!matcher.route("myapp://host/a", &RouteOptions::new()));
    assert!(!matcher.route("https://example.com/a", &RouteOptions::new()));
    assert!(!matcher.route("app://h/a/x/../b", &RouteOptions::new()));
    assert!(!matcher.route("app://h/a/./b/c", &RouteOptions::new()));
    assert!(seen.lock().unwrap().is_empty());

    assert!(matcher.route("MyApp://host/a", &RouteOptions::new()));
    assert!(matcher.route("https://www.Example.com/a", &RouteOptions::new()));
    let tags: Vec<String> = seen.lock().unwrap().iter().map(|(t, _)| t.clone()).collect();
    assert_eq!(tags, vec!["scheme", "host"]);
}
