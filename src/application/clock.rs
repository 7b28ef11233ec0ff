// Clock abstraction - "today" is injected rather than read inside the engine
use chrono::NaiveDate;

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}
