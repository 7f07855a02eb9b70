use axum::{extract::State, response::Json};
use tracing::instrument;

use super::AppState;
use crate::models::{AboutPage, HomePage};

/// Landing page
#[instrument(name = "home")]
pub async fn home() -> Json<HomePage> {
    Json(HomePage::default())
}

/// About page, filled from the `[about]` configuration section
#[instrument(name = "about", skip(state))]
pub async fn about(State(state): State<AppState>) -> Json<AboutPage> {
    let about = &state.about;
    Json(AboutPage {
        title: about.title.clone(),
        subtitle: about.subtitle.clone(),
        description: about.description.clone(),
        author: about.author.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{get, send, test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_home_page() {
        let app = test_app();

        let (status, body, _) = send(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Home Page - Online Store");
    }

    #[tokio::test]
    async fn test_about_page() {
        let app = test_app();

        let (status, body, _) = send(&app, get("/about/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "About us - Online Store");
        assert_eq!(body["subtitle"], "About us");
        assert_eq!(body["description"], "This is an about page");
        assert_eq!(body["author"], "Developed by: Kenia Toscano");
    }
}
