use modkit::api::problem::{Problem, ValidationError};
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};

#[derive(OpenApi)]
#[openapi(
    info(title = "ShareIt API", description = "Peer-to-peer item sharing"),
    paths(
        handlers::create_user,
        handlers::list_users,
        handlers::get_user,
        handlers::update_user,
        handlers::delete_user,
        handlers::create_item,
        handlers::update_item,
        handlers::get_item,
        handlers::list_owner_items,
        handlers::search_items,
        handlers::add_comment,
        handlers::create_booking,
        handlers::decide_booking,
        handlers::get_booking,
        handlers::list_booker_bookings,
        handlers::list_owner_bookings,
        handlers::create_request,
        handlers::list_own_requests,
        handlers::list_all_requests,
        handlers::get_request,
    ),
    components(schemas(
        dto::UserDto,
        dto::CreateUserReq,
        dto::UpdateUserReq,
        dto::ItemDto,
        dto::ItemDetailsDto,
        dto::BookingShortDto,
        dto::CreateItemReq,
        dto::UpdateItemReq,
        dto::BookingDto,
        dto::BookedItemDto,
        dto::BookerDto,
        dto::BookingStatusDto,
        dto::CreateBookingReq,
        dto::CommentDto,
        dto::CreateCommentReq,
        dto::ItemRequestDto,
        dto::CreateItemRequestReq,
        Problem,
        ValidationError,
    )),
    tags(
        (name = "users", description = "Registered people"),
        (name = "items", description = "Shareable things and their reviews"),
        (name = "bookings", description = "Booking lifecycle"),
        (name = "requests", description = "Requests for items nobody lists yet"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_booking_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/bookings"));
        assert!(paths.contains_key("/bookings/owner"));
        assert!(paths.contains_key("/bookings/{id}"));
        assert!(paths.contains_key("/items/{id}/comment"));
    }
}
