//! Custom assertion macros and utilities

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a room has exactly `$count` members and exists iff non-empty
#[macro_export]
macro_rules! assert_presence {
    ($registry:expr, $room:expr, $count:expr) => {
        assert_eq!($registry.count($room), $count, "unexpected presence in room {}", $room);
        assert_eq!(
            $registry.contains_room($room),
            $count > 0,
            "room {} should exist iff it has members",
            $room
        );
    };
}
