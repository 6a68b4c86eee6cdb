pub mod alert;
pub mod reconciler;
