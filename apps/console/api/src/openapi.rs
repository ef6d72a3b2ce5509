use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Console API", description = "Console single sign-on"),
    nest((path = "/console/api", api = domain_accounts::handlers::ApiDoc))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oauth_paths_are_served_under_console_prefix() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/console/api/oauth/login/{provider}"));
        assert!(doc.paths.paths.contains_key("/console/api/oauth/authorize/{provider}"));
    }
}
