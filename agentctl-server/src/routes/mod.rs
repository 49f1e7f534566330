//! Route modules, one per resource.

pub mod agents;
pub mod companies;
pub mod departments;
pub mod health;
pub mod holdings;
pub mod tasks;
pub mod users;

use agentctl_core::model::Paginated;

/// Map a repository page onto its response representation.
pub(crate) fn map_page<T, R: From<T>>(page: Paginated<T>) -> Paginated<R> {
    Paginated {
        items: page.items.into_iter().map(R::from).collect(),
        total: page.total,
        page: page.page,
        per_page: page.per_page,
    }
}
