use crate::{
    dtos::{
        MessageResponse,
        auth::{LoginRequest, LoginResponse},
        bank_card::{
            BankCardResponse, CardMovementResponse, CreateBankCardRequest, MoveFundsRequest,
            UpdateBankCardRequest,
        },
        booking::{
            BookingDetailsResponse, BookingResponse, CreateBookingRequest, ExcessCountResponse,
            OwnerSummary, UpdateBookingRequest,
        },
        excess::{
            ActionResponse, ActorSummary, BookingSummary, ChangeStatusRequest,
            CreateExcessRequest, DeleteDocumentRequest, DocumentInfo, ExcessDetailsResponse,
            ExcessResponse, StatusChangeResponse, UpdateExcessRequest,
        },
        finance::{
            FinanceResponse, LedgerBooking, LedgerCard, LedgerEntryResponse, LedgerExcess,
            LedgerResponse, SummaryResponse,
        },
        notification::{
            CreateNotificationRequest, MarkReadRequest, NotificationResponse, UnreadCountResponse,
        },
        user::{
            ActionSummary, CreateUserRequest, NewBookingsResponse, UpdateUserRequest,
            UserOverviewResponse, UserResponse,
        },
    },
    error::ErrorResponse,
    routes::{
        admin, auth, bank_cards, bookings, documents, excesses, finance, health, notifications,
        root,
    },
};
use models::{
    role::Role,
    status::{BookingStatus, ExcessStatus, FinanceType, RentalType},
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        health::health,
        auth::login,
        auth::me,
        bookings::list_bookings,
        bookings::create_booking,
        bookings::get_booking,
        bookings::update_booking,
        bookings::delete_booking,
        bookings::excesses_count,
        excesses::list_excesses,
        excesses::create_excess,
        excesses::update_excess,
        excesses::excess_details,
        excesses::change_status,
        documents::upload_documents,
        documents::delete_document,
        documents::download_document,
        finance::get_ledger,
        bank_cards::list_cards,
        bank_cards::create_card,
        bank_cards::update_card,
        bank_cards::delete_card,
        bank_cards::deposit,
        bank_cards::withdraw,
        notifications::list_notifications,
        notifications::create_notification,
        notifications::mark_read,
        notifications::unread_count,
        admin::list_users,
        admin::create_user,
        admin::get_user,
        admin::update_user,
        admin::delete_user,
        admin::toggle_active,
        admin::new_bookings,
        admin::all_bookings,
        admin::all_excesses
    ),
    components(schemas(
        ErrorResponse,
        MessageResponse,
        Role,
        BookingStatus,
        ExcessStatus,
        FinanceType,
        RentalType,
        LoginRequest,
        LoginResponse,
        UserResponse,
        CreateUserRequest,
        UpdateUserRequest,
        UserOverviewResponse,
        ActionSummary,
        NewBookingsResponse,
        CreateBookingRequest,
        UpdateBookingRequest,
        BookingResponse,
        BookingDetailsResponse,
        OwnerSummary,
        ExcessCountResponse,
        CreateExcessRequest,
        UpdateExcessRequest,
        ChangeStatusRequest,
        DeleteDocumentRequest,
        ExcessResponse,
        BookingSummary,
        DocumentInfo,
        ActorSummary,
        ActionResponse,
        ExcessDetailsResponse,
        StatusChangeResponse,
        FinanceResponse,
        LedgerBooking,
        LedgerExcess,
        LedgerCard,
        LedgerEntryResponse,
        SummaryResponse,
        LedgerResponse,
        CreateBankCardRequest,
        UpdateBankCardRequest,
        MoveFundsRequest,
        BankCardResponse,
        CardMovementResponse,
        CreateNotificationRequest,
        MarkReadRequest,
        NotificationResponse,
        UnreadCountResponse
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Authentication", description = "Login and session endpoints"),
        (name = "Bookings", description = "Car rental bookings"),
        (name = "Excesses", description = "Excess claims and their approval"),
        (name = "Documents", description = "Evidence attached to excesses"),
        (name = "Finance", description = "Account ledger"),
        (name = "Bank cards", description = "Stored cards and fund movements"),
        (name = "Notifications", description = "In-app notifications"),
        (name = "Admin", description = "Back-office endpoints"),
    ),
    info(
        title = "Cardoo API",
        version = "1.0.0",
        description = "Car rental excess management API",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
