pub mod audit;
pub mod bed;
pub mod booking;
pub mod guest_house;
pub mod room;
pub mod user;

pub use audit::{LogAction, LogEntry};
pub use bed::{Bed, BedStatus, NewBed, UpdateBed};
pub use booking::{Booking, BookingRequest, BookingStatus, NewBooking};
pub use guest_house::{GuestHouse, NewGuestHouse, UpdateGuestHouse};
pub use room::{NewRoom, Room, UpdateRoom};
pub use user::{NewUser, Role, UpdateUser, User};
