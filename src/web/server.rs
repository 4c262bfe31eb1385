use axum::{
    extract::{DefaultBodyLimit, Multipart, Path as UrlPath, Query, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};

use crate::catalog::navigator::{self, NavigationError};
use crate::catalog::registry::{add_material, remove_material};
use crate::catalog::store::{CatalogError, CatalogSource, NotesCatalog};
use crate::cli::ServeArgs;
use crate::core::material::{download_url, Material};
use crate::core::types::SemesterId;
use crate::utils::validation::{resolve_stored_file, validate_pdf_upload, ValidationError};

/// Security configuration constants to prevent `DoS` attacks
pub const MAX_MULTIPART_FIELDS: usize = 10;
pub const MAX_FILE_FIELD_SIZE: usize = 32 * 1024 * 1024; // 32MB
pub const MAX_TEXT_FIELD_SIZE: usize = 64 * 1024; // 64KB

/// Directory (under the data root) that uploads are stored in
pub const UPLOAD_DIR: &str = "data/notes";

/// Settings the handlers need beyond the catalog itself
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Catalog file written after every admin change; `None` keeps changes in memory
    pub catalog_path: Option<PathBuf>,
    /// Root that uploads are stored under and downloads are served from
    pub data_root: PathBuf,
    /// Static site served for non-API paths
    pub site_dir: Option<PathBuf>,
    /// Public origin used to resolve "/"-prefixed material paths
    pub origin: String,
}

/// Shared application state
pub struct AppState {
    pub catalog: RwLock<NotesCatalog>,
    pub config: ServerConfig,
}

impl AppState {
    #[must_use]
    pub fn new(catalog: NotesCatalog, config: ServerConfig) -> Self {
        Self {
            catalog: RwLock::new(catalog),
            config,
        }
    }
}

/// Enhanced error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

/// Body of `POST /api/admin/materials`
#[derive(Debug, Deserialize)]
pub struct AddMaterialRequest {
    pub semester: SemesterId,
    pub branch: String,
    pub subject: String,
    pub material: Material,
}

/// Body of `POST /api/admin/delete-material`
#[derive(Debug, Deserialize)]
pub struct DeleteMaterialRequest {
    pub semester: SemesterId,
    pub branch: String,
    pub subject: String,
    pub path: String,
}

#[derive(Deserialize)]
struct DownloadParams {
    path: Option<String>,
}

/// Fields collected from the upload form
#[derive(Default)]
struct UploadForm {
    semester: Option<String>,
    branch: Option<String>,
    subject: Option<String>,
    title: Option<String>,
    description: Option<String>,
    filename: Option<String>,
    content: Option<Vec<u8>>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    // Log detailed error server-side for debugging (not exposed to client)
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None, // Never expose internal details to prevent information disclosure
    }
}

fn error_reply(
    status: StatusCode,
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> Response {
    (
        status,
        Json(create_safe_error_response(
            error_type,
            user_message,
            internal_error,
        )),
    )
        .into_response()
}

fn navigation_error_reply(err: &NavigationError) -> Response {
    match err {
        NavigationError::NotFound { .. } => {
            error_reply(StatusCode::NOT_FOUND, "not_found", &err.to_string(), None)
        }
        NavigationError::DuplicateMaterial { .. } => error_reply(
            StatusCode::CONFLICT,
            "duplicate_material",
            &err.to_string(),
            None,
        ),
    }
}

fn persist_error_reply(err: &CatalogError) -> Response {
    error_reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        "persist_failed",
        "Failed to save the catalog",
        Some(&err.to_string()),
    )
}

/// Write the catalog back if the server was started with a catalog file
fn persist(config: &ServerConfig, catalog: &NotesCatalog) -> Result<(), CatalogError> {
    if let Some(path) = &config.catalog_path {
        catalog.save(path)?;
        info!("Catalog saved to {}", path.display());
    }
    Ok(())
}

/// Map a locator onto an uploaded file, never the catalog itself
fn stored_file(config: &ServerConfig, locator: &str) -> Option<PathBuf> {
    let path = resolve_stored_file(&config.data_root, UPLOAD_DIR, locator)?;
    let is_catalog = config.catalog_path.as_deref().is_some_and(|catalog| {
        match (std::fs::canonicalize(catalog), std::fs::canonicalize(&path)) {
            (Ok(a), Ok(b)) => a == b,
            _ => catalog == path,
        }
    });
    if is_catalog {
        warn!("Refusing to expose catalog file {}", path.display());
        return None;
    }
    Some(path)
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created, the catalog
/// cannot be loaded, or the server fails to start.
pub fn run(args: ServeArgs, source: CatalogSource) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args, source).await })
}

/// Create the application router with all routes and middleware configured.
///
/// Per-IP rate limiting needs the peer address and is added by the server
/// itself, so routers built here can be driven directly in tests.
pub fn create_router(state: Arc<AppState>) -> Router {
    let site_dir = state.config.site_dir.clone();

    let mut app = Router::new()
        .route("/api/catalog", get(catalog_handler))
        .route("/data/notes-data.json", get(catalog_handler))
        .route("/api/semesters", get(semesters_handler))
        .route("/api/semesters/{semester}/branches", get(branches_handler))
        .route(
            "/api/semesters/{semester}/branches/{branch}/subjects",
            get(subjects_handler),
        )
        .route(
            "/api/semesters/{semester}/branches/{branch}/subjects/{subject}/materials",
            get(materials_handler),
        )
        .route("/api/admin/materials", post(add_material_handler))
        .route("/api/admin/upload", post(upload_handler))
        .route("/api/admin/delete-material", post(delete_material_handler))
        .route("/api/download", get(download_handler))
        .with_state(state);

    if let Some(dir) = site_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(
        ServiceBuilder::new()
            // Security headers for browser protection
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("x-content-type-options"),
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("x-frame-options"),
                HeaderValue::from_static("DENY"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("referrer-policy"),
                HeaderValue::from_static("strict-origin-when-cross-origin"),
            ))
            // Request timeout to prevent slow client attacks
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(30),
            ))
            // Limit concurrent requests to prevent DOS
            .layer(ConcurrencyLimitLayer::new(100))
            // Limit request body size (largest upload + multipart overhead)
            .layer(DefaultBodyLimit::max(MAX_FILE_FIELD_SIZE + 1024 * 1024)),
    )
}

async fn run_server(args: ServeArgs, source: CatalogSource) -> anyhow::Result<()> {
    let catalog = NotesCatalog::load(&source).await?;

    let addr = format!("{}:{}", args.address, args.port);
    let config = ServerConfig {
        catalog_path: source.writable_path().map(Path::to_path_buf),
        data_root: args.data_root,
        site_dir: args.site_dir,
        origin: args.origin.unwrap_or_else(|| format!("http://{addr}")),
    };
    if config.catalog_path.is_none() {
        warn!("Catalog {source} is read-only; admin changes will not be saved");
    }

    // Configure IP-based rate limiting
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10) // 10 requests per second per IP
        .burst_size(50) // Allow bursts of 50 requests
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?;

    let app = create_router(Arc::new(AppState::new(catalog, config))).layer(GovernorLayer {
        config: Arc::new(governor_conf),
    });

    println!("Starting notes-browser web server at http://{addr}");

    if args.open {
        let _ = open::that(format!("http://{addr}"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// The raw catalog document
async fn catalog_handler(State(state): State<Arc<AppState>>) -> Json<NotesCatalog> {
    Json(state.catalog.read().await.clone())
}

async fn semesters_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let catalog = state.catalog.read().await;
    let semesters: Vec<serde_json::Value> = navigator::list_semesters(&catalog)
        .iter()
        .map(|s| {
            serde_json::json!({
                "id": s.id,
                "label": s.label(),
                "branch_count": s.branches.len(),
            })
        })
        .collect();

    Json(serde_json::json!({
        "count": semesters.len(),
        "semesters": semesters,
    }))
}

async fn branches_handler(
    State(state): State<Arc<AppState>>,
    UrlPath(semester): UrlPath<String>,
) -> Response {
    let catalog = state.catalog.read().await;
    match navigator::list_branches(&catalog, &semester) {
        Ok(branches) => Json(serde_json::json!({
            "semester": semester,
            "branches": branches
                .iter()
                .map(|b| serde_json::json!({
                    "id": b.id,
                    "name": b.name,
                    "subject_count": b.subjects.len(),
                }))
                .collect::<Vec<_>>(),
        }))
        .into_response(),
        Err(e) => navigation_error_reply(&e),
    }
}

async fn subjects_handler(
    State(state): State<Arc<AppState>>,
    UrlPath((semester, branch)): UrlPath<(String, String)>,
) -> Response {
    let catalog = state.catalog.read().await;
    match navigator::list_subjects(&catalog, &semester, &branch) {
        Ok(subjects) => Json(serde_json::json!({
            "semester": semester,
            "branch": branch,
            "subjects": subjects
                .iter()
                .map(|s| serde_json::json!({
                    "id": s.id,
                    "name": s.name,
                    "material_count": s.materials.len(),
                }))
                .collect::<Vec<_>>(),
        }))
        .into_response(),
        Err(e) => navigation_error_reply(&e),
    }
}

async fn materials_handler(
    State(state): State<Arc<AppState>>,
    UrlPath((semester, branch, subject)): UrlPath<(String, String, String)>,
) -> Response {
    let catalog = state.catalog.read().await;
    let listing = match navigator::list_materials(&catalog, &semester, &branch, &subject) {
        Ok(listing) => listing,
        Err(e) => return navigation_error_reply(&e),
    };

    let materials: Vec<serde_json::Value> = listing
        .unique
        .iter()
        .map(|m| {
            let mut value = serde_json::json!(m);
            value["url"] = serde_json::json!(m.locator(&state.config.origin));
            value["download_name"] = serde_json::json!(m.download_filename());
            value
        })
        .collect();

    Json(serde_json::json!({
        "semester": semester,
        "branch": branch,
        "subject": subject,
        "materials": materials,
        "duplicates_removed": listing.removed,
    }))
    .into_response()
}

/// Register a material described in JSON
async fn add_material_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddMaterialRequest>,
) -> Response {
    let mut catalog = state.catalog.write().await;

    // Mutate a copy so a failed save leaves the served catalog untouched
    let mut updated = catalog.clone();
    if let Err(e) = add_material(
        &mut updated,
        &request.semester.to_string(),
        &request.branch,
        &request.subject,
        request.material.clone(),
    ) {
        return navigation_error_reply(&e);
    }

    if let Err(e) = persist(&state.config, &updated) {
        return persist_error_reply(&e);
    }
    *catalog = updated;

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": "Material added.",
            "material": request.material,
        })),
    )
        .into_response()
}

/// Store an uploaded PDF and register it in the catalog
async fn upload_handler(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let form = match extract_upload_form(&mut multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let (
        Some(semester),
        Some(branch),
        Some(subject),
        Some(title),
        Some(description),
        Some(filename),
        Some(content),
    ) = (
        form.semester,
        form.branch,
        form.subject,
        form.title,
        form.description,
        form.filename,
        form.content,
    )
    else {
        return error_reply(
            StatusCode::BAD_REQUEST,
            "missing_fields",
            "Missing required fields.",
            None,
        );
    };

    let filename = match validate_pdf_upload(&filename, &content) {
        Ok(name) => name,
        Err(ValidationError::UnsupportedFormat(ext)) => {
            return error_reply(
                StatusCode::BAD_REQUEST,
                "unsupported_format",
                &format!("Unsupported file format: {ext}"),
                None,
            )
        }
        Err(e) => {
            return error_reply(
                StatusCode::BAD_REQUEST,
                "invalid_upload",
                &e.to_string(),
                None,
            )
        }
    };

    let mut catalog = state.catalog.write().await;

    let folder = navigator::find_semester(&catalog, &semester).and_then(|sem| {
        let branch_id = navigator::find_branch(&catalog, &semester, &branch)?.id.clone();
        let found = navigator::find_subject(&catalog, &semester, &branch, &subject)?;
        Ok(format!(
            "{UPLOAD_DIR}/semester-{}/{branch_id}/{}",
            sem.id,
            found.slug()
        ))
    });
    let relative_dir = match folder {
        Ok(dir) => dir,
        Err(e) => return navigation_error_reply(&e),
    };

    let locator = format!("/{relative_dir}/{filename}");
    let material = Material::new(title, description, &locator)
        .with_kind("pdf")
        .with_size(format!("{}KB", content.len() / 1024))
        .with_upload_date(chrono::Local::now().format("%Y-%m-%d").to_string())
        .with_download_url(download_url(&locator));

    let mut updated = catalog.clone();
    if let Err(e) = add_material(&mut updated, &semester, &branch, &subject, material.clone()) {
        return navigation_error_reply(&e);
    }

    let Some(file_path) = resolve_stored_file(&state.config.data_root, UPLOAD_DIR, &locator)
    else {
        return error_reply(
            StatusCode::BAD_REQUEST,
            "invalid_path",
            "Upload location is not valid",
            Some(&locator),
        );
    };
    if let Err(e) = write_upload(&file_path, &content).await {
        return error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "storage_failed",
            "Failed to store the uploaded file",
            Some(&format!("{}: {e}", file_path.display())),
        );
    }

    if let Err(e) = persist(&state.config, &updated) {
        let _ = tokio::fs::remove_file(&file_path).await;
        return persist_error_reply(&e);
    }
    *catalog = updated;
    info!("Stored upload {}", file_path.display());

    Json(serde_json::json!({
        "success": true,
        "message": "File uploaded and notes updated.",
        "material": material,
    }))
    .into_response()
}

async fn write_upload(path: &Path, content: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await
}

/// Extract upload fields from multipart form
async fn extract_upload_form(multipart: &mut Multipart) -> Result<UploadForm, Response> {
    let mut form = UploadForm::default();
    let mut fields_received = 0usize;

    loop {
        // Check field count limit before processing
        if fields_received >= MAX_MULTIPART_FIELDS {
            return Err(error_reply(
                StatusCode::BAD_REQUEST,
                "field_limit_exceeded",
                "Too many form fields",
                None,
            ));
        }

        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(error_reply(
                    StatusCode::BAD_REQUEST,
                    "malformed_form",
                    "Failed to parse upload form.",
                    Some(&e.to_string()),
                ))
            }
        };
        fields_received += 1;

        let name = field.name().unwrap_or_default().to_string();
        if name == "pdf" {
            form.filename = field.file_name().map(ToString::to_string);
            let bytes = field.bytes().await.map_err(|e| {
                error_reply(
                    StatusCode::BAD_REQUEST,
                    "malformed_form",
                    "Failed to read uploaded file.",
                    Some(&e.to_string()),
                )
            })?;
            if bytes.len() > MAX_FILE_FIELD_SIZE {
                return Err(error_reply(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "file_too_large",
                    "File size exceeds limit",
                    None,
                ));
            }
            form.content = Some(bytes.to_vec());
            continue;
        }

        let slot = match name.as_str() {
            "semester" => &mut form.semester,
            "branch" => &mut form.branch,
            "subject" => &mut form.subject,
            "title" => &mut form.title,
            "description" => &mut form.description,
            _ => continue, // Ignore unknown fields
        };

        let text = field.text().await.map_err(|e| {
            error_reply(
                StatusCode::BAD_REQUEST,
                "malformed_form",
                "Failed to read form field.",
                Some(&e.to_string()),
            )
        })?;
        if text.len() > MAX_TEXT_FIELD_SIZE {
            return Err(error_reply(
                StatusCode::PAYLOAD_TOO_LARGE,
                "text_too_large",
                "Text field size exceeds limit",
                None,
            ));
        }
        let text = text.trim();
        if !text.is_empty() {
            *slot = Some(text.to_string());
        }
    }

    Ok(form)
}

/// Remove a material from the catalog and delete its stored file
async fn delete_material_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DeleteMaterialRequest>,
) -> Response {
    let mut catalog = state.catalog.write().await;

    let mut updated = catalog.clone();
    if let Err(e) = remove_material(
        &mut updated,
        &request.semester.to_string(),
        &request.branch,
        &request.subject,
        &request.path,
    ) {
        return navigation_error_reply(&e);
    }

    if let Err(e) = persist(&state.config, &updated) {
        return persist_error_reply(&e);
    }
    *catalog = updated;

    if let Some(file_path) = stored_file(&state.config, &request.path) {
        if tokio::fs::metadata(&file_path).await.is_ok_and(|m| m.is_file()) {
            match tokio::fs::remove_file(&file_path).await {
                Ok(()) => info!("PDF file deleted: {}", file_path.display()),
                Err(e) => warn!("Failed to delete {}: {e}", file_path.display()),
            }
        }
    }

    Json(serde_json::json!({
        "success": true,
        "message": "Material deleted successfully",
    }))
    .into_response()
}

/// Serve a stored material as an attachment
async fn download_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DownloadParams>,
) -> Response {
    let Some(path) = params.path.filter(|p| !p.trim().is_empty()) else {
        return error_reply(
            StatusCode::BAD_REQUEST,
            "missing_path",
            "Missing path parameter",
            None,
        );
    };

    let Some(file_path) = stored_file(&state.config, &path) else {
        return error_reply(
            StatusCode::BAD_REQUEST,
            "invalid_path",
            "Invalid file path",
            None,
        );
    };

    let content = match tokio::fs::read(&file_path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return error_reply(StatusCode::NOT_FOUND, "not_found", "File not found", None)
        }
        Err(e) => {
            return error_reply(
                StatusCode::NOT_FOUND,
                "not_found",
                "File not found",
                Some(&format!("{}: {e}", file_path.display())),
            )
        }
    };

    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "download".to_string());
    let is_pdf = Path::new(&file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    let content_type = if is_pdf {
        "application/pdf"
    } else {
        "application/octet-stream"
    };
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content,
    )
        .into_response()
}
