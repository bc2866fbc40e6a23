//! Request handlers for the API endpoints.

use axum::Json;
use axum::extract::{Path, State};

use crate::sim::manager::SharedGrid;
use crate::sim::types::{CommandError, CommandOutcome, DeviceView, Snapshot};

/// Returns the snapshot of the last completed tick.
///
/// `GET /state` → 200 + `Snapshot` JSON
pub async fn get_state(State(grid): State<SharedGrid>) -> Json<Snapshot> {
    Json(grid.snapshot())
}

/// Returns the device inventory in display order.
///
/// `GET /devices` → 200 + `Vec<DeviceView>` JSON
pub async fn list_devices(State(grid): State<SharedGrid>) -> Json<Vec<DeviceView>> {
    Json(grid.snapshot().devices)
}

/// Switches a device and forces one extra tick.
///
/// `POST /devices/{id}/on` → 200 + `CommandOutcome` JSON
/// `POST /devices/unknown/on` → 404 + `ErrorResponse`
/// `POST /devices/{id}/toggle` → 400 + `ErrorResponse`
pub async fn command_device(
    State(grid): State<SharedGrid>,
    Path((id, action)): Path<(String, String)>,
) -> Result<Json<CommandOutcome>, CommandError> {
    let outcome = grid.apply_command(&id, &action)?;
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    use crate::api::router;
    use crate::config::GridConfig;
    use crate::sim::clock::FixedClock;
    use crate::sim::manager::SharedGrid;

    fn make_grid() -> SharedGrid {
        SharedGrid::new(GridConfig::house().build(FixedClock(0.0)))
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn state_returns_200() {
        let app = router(make_grid());

        let req = Request::builder()
            .uri("/state")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["battery_pct"], 50.0);
        assert_eq!(json["battery_state"], "idle");
        assert_eq!(json["consumption_w"], 150.0);
        assert!(json["alert"].is_null());
        assert_eq!(json["devices"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn devices_lists_inventory_in_order() {
        let app = router(make_grid());

        let req = Request::builder()
            .uri("/devices")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json[0]["id"], "luz_cozinha");
        assert_eq!(json[1]["id"], "geladeira");
        assert_eq!(json[1]["on"], true);
        assert_eq!(json[2]["priority"], "low");
    }

    #[tokio::test]
    async fn command_switches_device() {
        let grid = make_grid();
        let app = router(grid.clone());

        let req = Request::builder()
            .method("POST")
            .uri("/devices/luz_cozinha/on")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["name"], "Kitchen Light");
        assert_eq!(json["on"], true);
        assert_eq!(grid.snapshot().tick, 1);
    }

    #[tokio::test]
    async fn unknown_device_returns_404() {
        let app = router(make_grid());

        let req = Request::builder()
            .method("POST")
            .uri("/devices/nonexistent/on")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("nonexistent"));
    }

    #[tokio::test]
    async fn invalid_action_returns_400() {
        let grid = make_grid();
        let app = router(grid.clone());

        let req = Request::builder()
            .method("POST")
            .uri("/devices/ar_condicionado/toggle")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(grid.snapshot().tick, 0);
    }
}
