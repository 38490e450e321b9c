use actix_web::{HttpResponse, get, web};
use log::{debug, warn};

use super::models::{NewTxRequest, required};
use crate::error::NodeError;
use crate::node::NodeState;
use crate::transaction::Transaction;

/// Body extractor settings for `/create-transaction`: a payload that is not a
/// `{author, content}` object of strings gets the same answer as a missing field.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        warn!("POST /create-transaction - rejected: {err}");
        NodeError::InvalidTransaction.into()
    })
}

/// Queue a client record. The node stamps the timestamp itself and keeps the
/// submitted text as is.
pub async fn create_transaction(
    state: web::Data<NodeState>,
    body: web::Json<NewTxRequest>,
) -> Result<HttpResponse, NodeError> {
    let (Some(author), Some(content)) = (required(&body.author), required(&body.content)) else {
        warn!("POST /create-transaction - rejected: author or content missing");
        return Err(NodeError::InvalidTransaction);
    };

    let tx = Transaction::new(author, content);
    let mut bc = state.blockchain.lock().expect("mutex poisoned");
    bc.add_new_transaction(tx);
    debug!(
        "POST /create-transaction - queued (pending size now {})",
        bc.pending().len()
    );
    Ok(HttpResponse::Created().body("Success"))
}

/// List transactions not yet sealed in a block.
#[get("/pending")]
pub async fn get_pending(state: web::Data<NodeState>) -> HttpResponse {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(bc.pending())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    use crate::api::{init_routes, testing};

    #[actix_web::test]
    async fn submitted_transaction_lands_in_pending() {
        let state = testing::state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/create-transaction")
            .set_json(json!({ "author": "alice", "content": "hello" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(test::read_body(resp).await, "Success");

        let req = test::TestRequest::get().uri("/pending").to_request();
        let pending: Value = test::call_and_read_body_json(&app, req).await;
        let pending = pending.as_array().unwrap();
        assert_eq!(pending.len(), 1);

        let tx = pending[0].as_object().unwrap();
        assert_eq!(tx["author"], "alice");
        assert_eq!(tx["content"], "hello");
        assert!(tx["timestamp"].as_f64().unwrap() > 0.0);
        assert!(!tx.contains_key("hash"));
        assert!(!tx.contains_key("index"));
    }

    #[actix_web::test]
    async fn missing_fields_are_rejected() {
        let state = testing::state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(init_routes)).await;

        for body in [
            json!({ "author": "alice" }),
            json!({ "content": "hello" }),
            json!({ "author": "", "content": "hello" }),
        ] {
            let req = test::TestRequest::post()
                .uri("/create-transaction")
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert_eq!(test::read_body(resp).await, "Invalid transaction data");
        }
        assert!(state.blockchain.lock().unwrap().pending().is_empty());
    }

    #[actix_web::test]
    async fn submitted_text_is_stored_verbatim() {
        let state = testing::state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/create-transaction")
            .set_json(json!({ "author": " alice ", "content": "  indented\n" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::get().uri("/pending").to_request();
        let pending: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(pending[0]["author"], " alice ");
        assert_eq!(pending[0]["content"], "  indented\n");
    }

    #[actix_web::test]
    async fn malformed_bodies_get_the_transaction_error() {
        let state = testing::state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(init_routes)).await;

        for body in [
            json!({ "author": 5, "content": "hello" }),
            json!({ "author": "alice", "content": ["hello"] }),
            json!(["alice", "hello"]),
        ] {
            let req = test::TestRequest::post()
                .uri("/create-transaction")
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert_eq!(test::read_body(resp).await, "Invalid transaction data");
        }

        let req = test::TestRequest::post()
            .uri("/create-transaction")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(test::read_body(resp).await, "Invalid transaction data");
        assert!(state.blockchain.lock().unwrap().pending().is_empty());
    }
}
