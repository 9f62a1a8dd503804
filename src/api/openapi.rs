//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{analytics, auth, books, borrows, fines, health, payments, users, ws};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblius API",
        version = "1.0.0",
        description = "Library Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Biblius Team", email = "contact@biblius.org")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::verify_email,
        auth::me,
        // Books
        books::search_books,
        books::get_book,
        books::add_book,
        books::edit_book,
        books::delete_book,
        // Borrows
        borrows::borrow_book,
        borrows::return_book,
        borrows::check_limit,
        // Fines
        fines::calculate_fine,
        fines::total_fine,
        // Payments
        payments::pay_fine,
        payments::generate_invoice,
        // Users
        users::get_user,
        users::get_user_borrows,
        users::update_account_status,
        // Analytics
        analytics::most_borrowed,
        analytics::monthly_report,
        // Notifications
        ws::notifications_ws,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::MessageResponse,
            crate::models::user::User,
            crate::models::user::Role,
            crate::models::user::RegisterUser,
            crate::models::user::UpdateAccountStatus,
            // Books
            crate::models::book::Book,
            crate::models::book::BookDetails,
            crate::models::book::Author,
            crate::models::book::Category,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::BookQuery,
            books::PaginatedBooks,
            // Borrows
            crate::models::borrow::BorrowedBook,
            crate::models::borrow::BorrowDetails,
            crate::models::borrow::CreateBorrow,
            crate::models::borrow::ReturnBorrow,
            crate::models::borrow::BorrowLimit,
            borrows::BorrowResponse,
            borrows::ReturnResponse,
            // Fines
            fines::FineResponse,
            fines::TotalFineResponse,
            // Payments
            crate::models::transaction::Transaction,
            crate::models::transaction::PayFine,
            crate::models::transaction::Invoice,
            crate::models::transaction::InvoiceUser,
            crate::models::transaction::InvoiceBook,
            payments::PaymentResponse,
            // Users
            users::UserBorrowsResponse,
            users::AccountStatusResponse,
            // Analytics
            analytics::MostBorrowedBook,
            analytics::MonthlyBorrowEntry,
            analytics::MonthlyReport,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Book catalog management"),
        (name = "borrows", description = "Borrowing workflow"),
        (name = "fines", description = "Fine calculation"),
        (name = "payments", description = "Fine payment and invoicing"),
        (name = "users", description = "User accounts"),
        (name = "analytics", description = "Usage analytics"),
        (name = "notifications", description = "WebSocket notifications")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
