pub mod client;
pub mod error;
pub mod model;

pub use client::ShareItApi;
pub use error::ShareItError;
pub use model::{
    Booking, BookingRef, BookingState, BookingStatus, Comment, Item, ItemDetails, ItemPatch,
    ItemRequest, ItemSummary, NewBooking, NewComment, NewItem, NewItemRequest, NewUser, User,
    UserPatch,
};
