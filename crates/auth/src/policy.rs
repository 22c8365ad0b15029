use serde::Serialize;

/// Guarded collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Categories,
    Products,
    Orders,
    Carts,
    Users,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Categories => "categories",
            Collection::Products => "products",
            Collection::Orders => "orders",
            Collection::Carts => "carts",
            Collection::Users => "users",
        }
    }

    /// Access policy attached to the collection.
    pub fn policy(self) -> Policy {
        match self {
            Collection::Categories | Collection::Products => Policy::PublicRead,
            Collection::Orders | Collection::Carts | Collection::Users => Policy::OwnerOnly,
        }
    }
}

impl core::fmt::Display for Collection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access policy of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Anyone may read; any authenticated principal may write.
    PublicRead,
    /// Only the owning user may read or write.
    OwnerOnly,
}

/// Kind of access being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Read,
    Write,
}

impl core::fmt::Display for Access {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Access::Read => f.write_str("read"),
            Access::Write => f.write_str("write"),
        }
    }
}
