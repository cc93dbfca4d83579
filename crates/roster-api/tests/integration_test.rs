// End-to-end tests for the Roster API
// Run with: cargo test --test integration_test -- --ignored
// Requires a running server, e.g. `ROSTER_ADDR=0.0.0.0:9000 cargo run`

use serde_json::json;

const API_BASE_URL: &str = "http://localhost:9000";

#[tokio::test]
#[ignore] // Run with: cargo test --test integration_test -- --ignored
async fn test_full_roster_workflow() {
    let client = reqwest::Client::new();

    println!("🧪 Testing full roster workflow...");

    // Step 1: Create a person
    println!("\n📝 Step 1: Creating person...");
    let create_response = client
        .post(format!("{}/v1/persons", API_BASE_URL))
        .json(&json!({"name": "Alice", "age": 25}))
        .send()
        .await
        .expect("Failed to create person");

    assert_eq!(
        create_response.status(),
        201,
        "Expected 201 Created, got {}",
        create_response.status()
    );

    let person: serde_json::Value = create_response
        .json()
        .await
        .expect("Failed to parse person response");
    let person_id = person["id"].as_i64().expect("person id missing");
    println!("✅ Created person: {}", person_id);
    assert_eq!(person["name"], "Alice");
    assert_eq!(person["age"], 25);

    // Step 2: Fetch it back
    println!("\n🔍 Step 2: Getting person by id...");
    let get_response = client
        .get(format!("{}/v1/persons/{}", API_BASE_URL, person_id))
        .send()
        .await
        .expect("Failed to get person");
    assert_eq!(get_response.status(), 200);

    // Step 3: Bulk create on the blocking pool
    println!("\n📦 Step 3: Bulk creating 100 persons...");
    let bulk_response = client
        .post(format!("{}/v1/persons/bulk", API_BASE_URL))
        .json(&json!({"count": 100}))
        .send()
        .await
        .expect("Failed to bulk create");
    assert_eq!(bulk_response.status(), 200);

    let summary: serde_json::Value = bulk_response.json().await.expect("Failed to parse summary");
    println!(
        "✅ Bulk insert: requested {} created {}",
        summary["requested"], summary["created"]
    );
    assert_eq!(summary["requested"], 100);
    assert_eq!(summary["created"], 100);

    // Step 4: Chunked bulk create
    println!("\n📦 Step 4: Chunked bulk creating 1200 persons...");
    let batched_response = client
        .post(format!("{}/v1/persons/bulk-batched", API_BASE_URL))
        .json(&json!({"count": 1200}))
        .send()
        .await
        .expect("Failed to bulk create batched");
    assert_eq!(batched_response.status(), 200);

    let summary: serde_json::Value = batched_response
        .json()
        .await
        .expect("Failed to parse summary");
    assert_eq!(summary["created"], 1200);

    // Step 5: Invalid counts are rejected
    println!("\n🚫 Step 5: Checking count validation...");
    for bad_count in [-5i64, 0, 20000] {
        let response = client
            .post(format!("{}/v1/persons/bulk", API_BASE_URL))
            .json(&json!({ "count": bad_count }))
            .send()
            .await
            .expect("Failed to send bulk request");
        assert_eq!(response.status(), 400, "count {bad_count} should be rejected");
    }
    println!("✅ Invalid counts rejected");

    // Step 6: Fan-out fetch
    println!("\n🌐 Step 6: Fan-out fetch...");
    let fanout_response = client
        .get(format!("{}/v1/fetch/fanout", API_BASE_URL))
        .send()
        .await
        .expect("Failed to fan out");
    assert_eq!(fanout_response.status(), 200);

    let fanout: serde_json::Value = fanout_response.json().await.expect("Failed to parse fanout");
    let results = fanout["results"].as_array().expect("results missing");
    assert!(!results.is_empty());
    for entry in results {
        assert!(
            entry.get("status").is_some() || entry.get("error").is_some(),
            "each entry carries a status or an error"
        );
    }
    println!("✅ Fan-out returned {} entries", results.len());

    println!("\n🎉 Full roster workflow passed!");
}
