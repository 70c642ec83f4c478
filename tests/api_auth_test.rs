//! Integration tests for the auth API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::util::ServiceExt;

    use crate::test_utils::{body_to_string, test_app};

    fn auth_request(uri: &str, email: &str, password: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"email": email, "password": password}).to_string(),
            ))
            .unwrap()
    }

    /// Tests a successful login returns the session
    #[tokio::test]
    #[serial]
    async fn it_logs_in() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/accounts:signInWithPassword")
            .match_query(mockito::Matcher::UrlEncoded(
                "key".into(),
                "test-identity-key".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"localId":"uid-42","email":"sam@example.com","idToken":"token"}"#)
            .create_async()
            .await;
        let (app, _dir) = test_app("http://127.0.0.1:9", &server.url()).await;

        let response = app
            .oneshot(auth_request("/api/auth/login", "sam@example.com", "hunter22"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        assert_eq!(body["user_id"], "uid-42");
        assert_eq!(body["email"], "sam@example.com");
    }

    /// Tests provider errors are passed through unchanged
    #[tokio::test]
    #[serial]
    async fn it_surfaces_signup_failures() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/accounts:signUp")
            .match_query(mockito::Matcher::Any)
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"code":400,"message":"WEAK_PASSWORD : Password should be at least 6 characters"}}"#)
            .create_async()
            .await;
        let (app, _dir) = test_app("http://127.0.0.1:9", &server.url()).await;

        let response = app
            .oneshot(auth_request("/api/auth/signup", "sam@example.com", "123"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        assert_eq!(body["error"], "Signup Failed");
        assert_eq!(
            body["message"],
            "WEAK_PASSWORD : Password should be at least 6 characters"
        );
    }

    /// Tests missing credentials never reach the provider
    #[tokio::test]
    #[serial]
    async fn it_requires_email_and_password() {
        let (app, _dir) = test_app("http://127.0.0.1:9", "http://127.0.0.1:9").await;

        let response = app
            .oneshot(auth_request("/api/auth/login", "", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        assert_eq!(body["message"], "Please enter email and password");
    }
}
