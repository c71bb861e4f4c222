pub mod buttons;
pub mod card;
pub mod field;
pub mod hints;
pub mod step_indicator;
pub mod toast;
