//! Integration tests for the chat and bookings API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::util::ServiceExt;

    use medgod::kv::{KvStore, StorageKey};

    use crate::test_utils::{
        TRIAGE_REPLY, body_to_string, completion_body, test_app, test_config, test_kv,
    };

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = body_to_string(response.into_body()).await;
        (status, serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }

    async fn post_json(app: &Router, uri: &str, payload: Value) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = body_to_string(response.into_body()).await;
        (status, serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }

    async fn mock_completion(server: &mut mockito::ServerGuard) -> mockito::Mock {
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(TRIAGE_REPLY))
            .create_async()
            .await
    }

    /// Tests a new user gets the greeting and no booking prompts
    #[tokio::test]
    #[serial]
    async fn it_gets_the_greeting_for_new_users() {
        let (app, _dir) = test_app("http://127.0.0.1:9", "http://127.0.0.1:9").await;

        let (status, body) = get_json(&app, "/api/users/new-user/chat").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transcript"].as_array().unwrap().len(), 1);
        assert_eq!(body["transcript"][0]["role"], "ai");
        assert_eq!(body["affordances"], "hidden");
        assert_eq!(body["flags"]["tests_booked"], false);
        assert_eq!(body["flags"]["meds_booked"], false);
    }

    /// Tests sending a message returns the reply and booking prompts
    #[tokio::test]
    #[serial]
    async fn it_sends_a_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = mock_completion(&mut server).await;
        let (app, _dir) = test_app(&server.url(), "http://127.0.0.1:9").await;

        let (status, body) = post_json(
            &app,
            "/api/users/u1/chat",
            json!({"message": "I have a fever and body aches"}),
        )
        .await;

        mock.assert_async().await;
        assert_eq!(status, StatusCode::OK);
        let transcript = body["transcript"].as_array().unwrap();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1]["role"], "user");
        assert_eq!(transcript[2]["text"], TRIAGE_REPLY.trim());
        assert_eq!(body["affordances"], "both");
        assert_eq!(body["recommendation"]["medicines"][1], "Oseltamivir");
        assert_eq!(body["version"]["index"], 2);

        // The transcript is persisted for the next request
        let (_, body) = get_json(&app, "/api/users/u1/chat").await;
        assert_eq!(body["transcript"].as_array().unwrap().len(), 3);
    }

    /// Tests blank messages are ignored
    #[tokio::test]
    #[serial]
    async fn it_ignores_blank_messages() {
        let (app, _dir) = test_app("http://127.0.0.1:9", "http://127.0.0.1:9").await;

        let (status, body) =
            post_json(&app, "/api/users/u1/chat", json!({"message": "   "})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transcript"].as_array().unwrap().len(), 1);
    }

    /// Tests booking each category until the already booked notice
    /// shows, and that a new reply offers booking again
    #[tokio::test]
    #[serial]
    async fn it_books_recommendations() {
        let mut server = mockito::Server::new_async().await;
        let _mock = mock_completion(&mut server).await;
        let (app, _dir) = test_app(&server.url(), "http://127.0.0.1:9").await;

        post_json(&app, "/api/users/u1/chat", json!({"message": "fever"})).await;

        let (status, body) = post_json(
            &app,
            "/api/users/u1/bookings/tests",
            json!({"selected": ["Influenza A/B swab"]}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["booked"], json!(["Influenza A/B swab"]));
        assert_eq!(body["chat"]["affordances"], "medicines_only");

        let (status, body) = post_json(
            &app,
            "/api/users/u1/bookings/medicines",
            json!({"selected": ["Paracetamol 500mg", "Oseltamivir"]}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chat"]["affordances"], "already_booked");
        assert_eq!(
            body["chat"]["notice"],
            "✅ Tests and medicines already booked."
        );

        // Booking again is refused
        let (status, _) = post_json(
            &app,
            "/api/users/u1/bookings/tests",
            json!({"selected": ["Influenza A/B swab"]}),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        // A new reply resets the flags
        let (_, body) = post_json(&app, "/api/users/u1/chat", json!({"message": "still sick"})).await;
        assert_eq!(body["affordances"], "both");
        assert_eq!(body["flags"]["tests_booked"], false);
    }

    /// Tests confirming without a selection is rejected
    #[tokio::test]
    #[serial]
    async fn it_rejects_empty_and_unknown_selections() {
        let mut server = mockito::Server::new_async().await;
        let _mock = mock_completion(&mut server).await;
        let (app, _dir) = test_app(&server.url(), "http://127.0.0.1:9").await;
        post_json(&app, "/api/users/u1/chat", json!({"message": "fever"})).await;

        let (status, body) =
            post_json(&app, "/api/users/u1/bookings/tests", json!({"selected": []})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "No test selected: Please select at least one test.");

        let (status, _) = post_json(
            &app,
            "/api/users/u1/bookings/medicines",
            json!({"selected": ["Aspirin"]}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            post_json(&app, "/api/users/u1/bookings/x-rays", json!({"selected": []})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    /// Tests there is nothing to book before any recommendation
    #[tokio::test]
    #[serial]
    async fn it_refuses_booking_without_a_recommendation() {
        let (app, _dir) = test_app("http://127.0.0.1:9", "http://127.0.0.1:9").await;

        let (status, _) = post_json(
            &app,
            "/api/users/u1/bookings/tests",
            json!({"selected": ["CBC"]}),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    /// Tests the manual reset clears bookings
    #[tokio::test]
    #[serial]
    async fn it_resets_bookings() {
        let mut server = mockito::Server::new_async().await;
        let _mock = mock_completion(&mut server).await;
        let (app, _dir) = test_app(&server.url(), "http://127.0.0.1:9").await;
        post_json(&app, "/api/users/u1/chat", json!({"message": "fever"})).await;
        post_json(
            &app,
            "/api/users/u1/bookings/tests",
            json!({"selected": ["Complete Blood Count (CBC)"]}),
        )
        .await;

        let (status, body) = post_json(&app, "/api/users/u1/bookings/reset", json!({})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["flags"]["tests_booked"], false);
        assert_eq!(body["affordances"], "both");
    }

    /// Tests an unreadable history is shown as a fresh chat but never
    /// overwritten by a new message
    #[tokio::test]
    #[serial]
    async fn it_keeps_unreadable_history() {
        let (app, dir) = test_app("http://127.0.0.1:9", "http://127.0.0.1:9").await;
        let kv = test_kv(&test_config(&dir, "http://127.0.0.1:9", "http://127.0.0.1:9")).await;
        kv.set(&StorageKey::chat_history("user-1"), "not json")
            .await
            .unwrap();

        let (status, body) = get_json(&app, "/api/users/user-1/chat").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transcript"].as_array().unwrap().len(), 1);
        assert_eq!(body["transcript"][0]["role"], "ai");

        let (status, _) = post_json(
            &app,
            "/api/users/user-1/chat",
            json!({"message": "I have a fever"}),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = post_json(&app, "/api/users/user-1/bookings/reset", json!({})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(
            kv.get(&StorageKey::chat_history("user-1")).await.unwrap(),
            Some("not json".to_string())
        );
    }
}
