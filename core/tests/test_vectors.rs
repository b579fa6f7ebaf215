//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use datasets_core::{
    ApiError, CopySource, DatasetSummary, DatasetsClient, GetDatasetsOptions, HistoryContentType,
    HttpMethod, HttpRequest, HttpResponse, TaggableItemClass,
};

const BASE_URL: &str = "http://localhost:8080";

fn client() -> DatasetsClient {
    DatasetsClient::new(BASE_URL).unwrap()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated_response(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn options_from(input: &serde_json::Value) -> GetDatasetsOptions {
    GetDatasetsOptions {
        limit: input["limit"].as_u64().map(|n| n as u32),
        offset: input["offset"].as_u64().map(|n| n as u32),
        sort_by: input["sort_by"].as_str().map(str::to_string),
        sort_desc: input["sort_desc"].as_bool().unwrap_or(false),
        query: input["query"].as_str().map(str::to_string),
    }
}

fn assert_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match req.body.as_deref() {
        Some(body) => {
            let req_body: serde_json::Value = serde_json::from_str(body).unwrap();
            assert_eq!(req_body, expected["body"], "{name}: body");
        }
        None => assert!(expected["body"].is_null(), "{name}: body should be None"),
    }
}

fn assert_expected_error(name: &str, case: &serde_json::Value, err: ApiError) {
    match case["expected_error"].as_str().unwrap() {
        "NotFound" => assert!(matches!(err, ApiError::NotFound), "{name}: expected NotFound"),
        "Http" => assert!(matches!(err, ApiError::Http { .. }), "{name}: expected Http"),
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let raw = include_str!("../../test-vectors/list.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_list_datasets(&options_from(&case["input"]));
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let datasets = c.parse_list_datasets(simulated_response(case)).unwrap();
        let expected: Vec<DatasetSummary> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(datasets, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Content items and tags
// ---------------------------------------------------------------------------

#[test]
fn content_test_vectors() {
    let raw = include_str!("../../test-vectors/content.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let id = input["id"].as_str().unwrap();
        let response = simulated_response(case);
        let status = response.status;

        match case["operation"].as_str().unwrap() {
            "undelete" => {
                let history_id = input["history_id"].as_str().unwrap();
                let req = c.build_undelete_dataset(history_id, id).unwrap();
                assert_request(name, &req, &case["expected_request"]);
                match c.parse_undelete_dataset(response) {
                    Ok(item) => assert_eq!(item.id, id, "{name}: id"),
                    Err(err) => assert_expected_error(name, case, err),
                }
            }
            "purge" => {
                let history_id = input["history_id"].as_str().unwrap();
                let req = c.build_purge_dataset(history_id, id);
                assert_request(name, &req, &case["expected_request"]);
                let item = c.parse_purge_dataset(response).unwrap();
                assert_eq!(item.is_none(), status == 204, "{name}: empty ack");
                if let Some(item) = item {
                    assert!(item.purged, "{name}: purged");
                    let expected = &case["expected_result"];
                    if expected.is_object() {
                        assert_eq!(item.id, expected["id"].as_str().unwrap(), "{name}: id");
                        assert_eq!(item.history_id.as_deref(), expected["history_id"].as_str(), "{name}: history");
                    }
                }
            }
            "copy" => {
                let history_id = input["history_id"].as_str().unwrap();
                let req = c
                    .build_copy_content(id, history_id, HistoryContentType::default(), CopySource::default())
                    .unwrap();
                assert_request(name, &req, &case["expected_request"]);
                match c.parse_copy_content(response) {
                    Ok(item) => assert_eq!(item.history_id.as_deref(), Some(history_id), "{name}: history"),
                    Err(err) => assert_expected_error(name, case, err),
                }
            }
            "update_tags" => {
                let item_class: TaggableItemClass =
                    serde_json::from_value(input["item_class"].clone()).unwrap();
                let tags: Vec<String> = serde_json::from_value(input["item_tags"].clone()).unwrap();
                let req = c.build_update_tags(id, item_class, &tags).unwrap();
                assert_request(name, &req, &case["expected_request"]);
                assert!(c.parse_update_tags(response).unwrap().is_none(), "{name}: empty ack");
            }
            other => panic!("{name}: unknown operation: {other}"),
        }
    }
}
