mod category;
mod goal;
mod status;
mod view;

pub(crate) use category::GoalCategory;
pub(crate) use goal::{Goal, GoalUpdate};
pub(crate) use status::GoalStatus;
pub(crate) use view::GoalView;
