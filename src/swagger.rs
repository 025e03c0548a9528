use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{RaffleStatus, TicketTransactionType};
use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::raffle::list_raffles,
        handlers::raffle::get_my_entries,
        handlers::raffle::get_raffle_detail,
        handlers::raffle::enter_raffle,
        handlers::raffle::verify_draw,
        handlers::wallet::get_wallet,
        handlers::wallet::get_transactions,
        handlers::admin::create_raffle,
        handlers::admin::force_draw,
        handlers::admin::fund_raffle,
        handlers::admin::get_actor_status,
        handlers::admin::set_boost,
        handlers::admin::grant_tickets,
    ),
    components(
        schemas(
            RaffleStatus,
            RaffleSummary,
            RaffleListQuery,
            RaffleDetailResponse,
            TopEntryView,
            WinnerView,
            EnterRaffleRequest,
            EnterRaffleResponse,
            UserEntryResponse,
            CreateRaffleRequest,
            FundRaffleRequest,
            DrawResultResponse,
            RaffleActorStatusResponse,
            VerifyDrawResponse,
            WalletResponse,
            TicketTransactionType,
            TicketTransactionResponse,
            TransactionQuery,
            GrantTicketsRequest,
            GrantTicketsResponse,
            SetBoostRequest,
            BoostResponse,
            ApiError,
            PaginationParams,
            PaginationInfo,
        )
    ),
    tags(
        (name = "raffle", description = "Raffle lifecycle API"),
        (name = "wallet", description = "Ticket wallet API"),
        (name = "admin", description = "Admin operations API"),
    ),
    info(
        title = "Arcade Backend API",
        version = "1.0.0",
        description = "Ticket-economy arcade REST API documentation",
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
