pub mod tokens {

    pub const DEFAULT_TTL_SECONDS: u64 = 3600;
}

pub mod roles {

    /// Username that carries the administrator role. There is no roles table;
    /// this literal is the only place the role is derived from.
    pub const ADMIN_USERNAME: &str = "Admin";
}

pub mod limits {

    pub const MAX_USERNAME_LEN: usize = 64;

    pub const MAX_CATEGORY_NAME_LEN: usize = 64;

    pub const MAX_ITEM_TITLE_LEN: usize = 64;

    pub const MAX_DESCRIPTION_LEN: usize = 1000;
}
