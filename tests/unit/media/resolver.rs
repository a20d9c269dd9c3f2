use super::*;

const IMAGES: &str = r#"{
    "total": 3,
    "hits": [
        {"id": 1, "tags": "code, laptop", "previewURL": "p1.jpg", "webformatURL": "w1.jpg", "largeImageURL": "l1.jpg"},
        {"id": 2, "tags": "sunset", "previewURL": "p2.jpg", "webformatURL": "w2.jpg"},
        {"id": 3, "tags": "empty", "largeImageURL": ""}
    ]
}"#;

const VIDEOS: &str = r#"{
    "hits": [
        {"id": 7, "tags": "city", "videos": {"small": {"url": "s7.mp4"}, "tiny": {"url": "t7.mp4"}}},
        {"id": 8, "tags": "ocean", "videos": {"medium": {"url": "m8.mp4"}, "tiny": {"url": "t8.mp4"}}}
    ]
}"#;

struct Failing;

impl MediaResolver for Failing {
    fn search(&self, _query: &MediaQuery) -> EditorResult<Vec<MediaHit>> {
        Err(EditorError::resolve("upstream returned 500"))
    }
}

#[test]
fn query_carries_defaults_and_drops_unknown_params() {
    let q = MediaQuery::new(SearchKind::Images, "coding background")
        .with_param("orientation", "vertical")
        .with_param("video_type", "film")
        .with_param("per_page", "5");
    let pairs = q.to_query_pairs();

    let get = |k: &str| pairs.iter().find(|(key, _)| key == k).map(|(_, v)| v.as_str());
    assert_eq!(get("q"), Some("coding background"));
    assert_eq!(get("safesearch"), Some("true"));
    assert_eq!(get("per_page"), Some("5"));
    assert_eq!(get("orientation"), Some("vertical"));
    assert_eq!(get("video_type"), None);
    assert_eq!(get("page"), None);
}

#[test]
fn video_queries_allow_video_type_only() {
    let pairs = MediaQuery::new(SearchKind::Videos, "rain")
        .with_param("video_type", "film")
        .with_param("colors", "red")
        .to_query_pairs();
    assert!(pairs.iter().any(|(k, _)| k == "video_type"));
    assert!(!pairs.iter().any(|(k, _)| k == "colors"));
}

#[test]
fn image_hits_prefer_large_then_webformat() {
    let hits = parse_pixabay_response(SearchKind::Images, IMAGES).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].pick_url(), Some("l1.jpg"));
    assert_eq!(hits[1].pick_url(), Some("w2.jpg"));
    assert_eq!(hits[1].preview_url.as_deref(), Some("p2.jpg"));
}

#[test]
fn video_hits_prefer_medium_then_small() {
    let hits = parse_pixabay_response(SearchKind::Videos, VIDEOS).unwrap();
    assert_eq!(hits[0].pick_url(), Some("s7.mp4"));
    assert_eq!(hits[1].pick_url(), Some("m8.mp4"));
    assert_eq!(hits[0].preview_url.as_deref(), Some("t7.mp4"));
}

#[test]
fn missing_hits_array_is_empty_but_garbage_is_an_error() {
    assert!(parse_pixabay_response(SearchKind::Images, r#"{"error": "x"}"#)
        .unwrap()
        .is_empty());
    assert!(parse_pixabay_response(SearchKind::Images, r#"{"hits": 3}"#)
        .unwrap()
        .is_empty());
    assert!(matches!(
        parse_pixabay_response(SearchKind::Images, "<html>"),
        Err(EditorError::Resolve(_))
    ));
}

#[test]
fn failed_search_reports_inline_with_no_hits() {
    let out = search_or_empty(&Failing, &MediaQuery::new(SearchKind::Images, "x"));
    assert!(out.hits.is_empty());
    assert!(out.error.unwrap().contains("500"));
}

#[test]
fn static_resolver_filters_by_kind_and_tags() {
    let resolver = StaticResolver::from_response(SearchKind::Images, IMAGES).unwrap();
    let out = search_or_empty(&resolver, &MediaQuery::new(SearchKind::Images, "Sunset"));
    assert_eq!(out.hits.len(), 1);
    assert_eq!(out.hits[0].id, 2);
    assert!(resolver
        .search(&MediaQuery::new(SearchKind::Videos, ""))
        .unwrap()
        .is_empty());
}

#[test]
fn pick_switches_background_mode_and_source() {
    let mut scene = Scene::new();
    let video = &parse_pixabay_response(SearchKind::Videos, VIDEOS).unwrap()[1];
    let rev = scene.revision();
    scene.apply_media_pick(video).unwrap();
    assert_eq!(scene.media_kind(), MediaKind::Video);
    assert_eq!(scene.media_source(), Some("m8.mp4"));
    assert!(scene.revision() > rev);

    let image = &parse_pixabay_response(SearchKind::Images, IMAGES).unwrap()[0];
    scene.apply_media_pick(image).unwrap();
    assert_eq!(scene.background_image_source(), Some("l1.jpg"));

    scene.use_gradient();
    assert_eq!(scene.media_kind(), MediaKind::Gradient);
    assert_eq!(scene.background_image_source(), None);
}

#[test]
fn pick_without_url_leaves_scene_untouched() {
    let mut scene = Scene::new();
    let before = scene.clone();
    let hit = MediaHit {
        id: 9,
        tags: String::new(),
        kind: SearchKind::Images,
        preview_url: None,
        urls: Vec::new(),
    };
    assert!(scene.apply_media_pick(&hit).is_err());
    assert_eq!(scene, before);
}
