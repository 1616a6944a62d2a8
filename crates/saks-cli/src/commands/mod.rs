pub mod attachment;
pub mod audit;
pub mod case;
pub mod comment;
pub mod dispatch;
pub mod meeting;
pub mod minutes;
pub mod pdf;
pub mod shared;
