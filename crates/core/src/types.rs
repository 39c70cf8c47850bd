/// Persisted post ids (payments, users) are positive integers.
pub type DbId = i64;

/// WordPress user id as carried in the `ID` property of user records.
pub type UserId = DbId;
