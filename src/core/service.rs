/// A named, long-lived collaborator (search backend, shortcut table, ...).
pub trait Service {
    fn name(&self) -> &'static str;
}
