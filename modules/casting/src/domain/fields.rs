//! Field names and storage limits shared by validation and migrations.

pub struct ActorFields;

impl ActorFields {
    pub const NAME: &'static str = "name";
    pub const AGE: &'static str = "age";
    pub const GENDER: &'static str = "gender";

    pub const NAME_MAX_LEN: usize = 120;
    pub const GENDER_MAX_LEN: usize = 10;
}

pub struct MovieFields;

impl MovieFields {
    pub const TITLE: &'static str = "title";
    pub const RELEASE_YEAR: &'static str = "release_year";
    pub const GENRE: &'static str = "genre";

    pub const TITLE_MAX_LEN: usize = 120;
    pub const RELEASE_YEAR_LEN: usize = 4;
    pub const GENRE_MAX_LEN: usize = 50;
}

pub struct RoleFields;

impl RoleFields {
    pub const ACTOR_ID: &'static str = "actor_id";
}
