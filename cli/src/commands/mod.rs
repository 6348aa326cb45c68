pub mod card;
pub mod clock;
pub mod health;
pub mod schedule;
