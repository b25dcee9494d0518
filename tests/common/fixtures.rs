// Test fixtures: sample candidates and upstream response bodies

use kakao_place_mcp::core::types::PlaceCandidate;
use serde_json::{json, Value};

/// Query from the usage example
#[allow(dead_code)]
pub const GANGNAM_QUERY: &str = "강남역 맛집";

/// Candidate with every field derived from `name`
#[allow(dead_code)]
pub fn candidate(name: &str) -> PlaceCandidate {
    PlaceCandidate {
        name: name.to_string(),
        address: format!("서울 강남구 {name}로 1"),
        category: "음식점 > 한식".to_string(),
        url: format!("http://place.map.kakao.com/{name}"),
        phone: "02-000-0000".to_string(),
    }
}

#[allow(dead_code)]
pub fn candidates(names: &[&str]) -> Vec<PlaceCandidate> {
    names.iter().map(|name| candidate(name)).collect()
}

/// Keyword search body, with the extra fields the real API returns
#[allow(dead_code)]
pub fn keyword_body(names: &[&str]) -> Value {
    let documents: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "id": format!("{}", 1000 + i),
                "place_name": name,
                "address_name": format!("서울 강남구 역삼동 {}", 800 + i),
                "road_address_name": "서울 강남구 강남대로 396",
                "category_name": "음식점 > 한식",
                "category_group_code": "FD6",
                "place_url": format!("http://place.map.kakao.com/{}", 1000 + i),
                "phone": "02-123-4567",
                "x": "127.0276",
                "y": "37.4979"
            })
        })
        .collect();

    json!({
        "meta": {"total_count": names.len(), "pageable_count": names.len(), "is_end": true},
        "documents": documents
    })
}

/// Web search body with `count` documents
#[allow(dead_code)]
pub fn web_body(count: usize) -> Value {
    let documents: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "title": format!("후기 {i}"),
                "contents": format!("<b>강남역</b> 맛집 방문 후기 {i}"),
                "url": format!("https://blog.example/{i}"),
                "datetime": "2024-01-01T00:00:00.000+09:00"
            })
        })
        .collect();

    json!({ "meta": {"total_count": count, "is_end": true}, "documents": documents })
}

/// Image search body with the given image URLs, first one first
#[allow(dead_code)]
pub fn image_body(urls: &[&str]) -> Value {
    let documents: Vec<Value> = urls
        .iter()
        .map(|url| {
            json!({
                "collection": "blog",
                "thumbnail_url": format!("{url}?thumb"),
                "image_url": url,
                "width": 640,
                "height": 480
            })
        })
        .collect();

    json!({ "meta": {"total_count": urls.len(), "is_end": true}, "documents": documents })
}
