pub mod book_access;
pub mod books;
pub mod health;
pub mod notifications;

#[cfg(test)]
mod test_support;
