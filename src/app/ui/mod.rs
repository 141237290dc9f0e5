mod code;
mod controls;
mod details;
mod panels;
mod search;
mod tree;

pub(super) use code::CodePanel;
pub(super) use details::DetailPanel;
pub(super) use search::SearchPanel;
pub(super) use tree::TreePanel;
