//! Warehouse statements
//!
//! Two staging tables land the raw event and song records; the star
//! schema is one fact table (`songplays`) referencing four dimensions
//! (`users`, `songs`, `artists`, `time`). Creation order puts the
//! dimensions before the fact table because of the foreign-key
//! references; drop order is the exact reverse.

use crate::template::StatementTemplate;

// DDL

const STAGING_EVENTS_CREATE: StatementTemplate = StatementTemplate::new(
    "create staging_events",
    r#"
CREATE TABLE IF NOT EXISTS staging_events (
  artist VARCHAR(255),
  auth VARCHAR(15),
  firstName VARCHAR(25),
  gender VARCHAR(1),
  itemInSession INTEGER,
  lastName VARCHAR(25),
  length DOUBLE PRECISION,
  level VARCHAR(5),
  location VARCHAR(50),
  method VARCHAR(10),
  page VARCHAR(20),
  registration DOUBLE PRECISION,
  session_id INTEGER,
  song VARCHAR(255),
  status INTEGER,
  ts TIMESTAMP distkey,
  userAgent VARCHAR(255),
  userId INTEGER
);
"#,
);

const STAGING_SONGS_CREATE: StatementTemplate = StatementTemplate::new(
    "create staging_songs",
    r#"
CREATE TABLE IF NOT EXISTS staging_songs (
  artist_id VARCHAR(25) distkey,
  artist_latitude DOUBLE PRECISION,
  artist_location VARCHAR(255),
  artist_longitude DOUBLE PRECISION,
  artist_name VARCHAR(255),
  duration DOUBLE PRECISION,
  num_songs INTEGER,
  song_id VARCHAR(25),
  title VARCHAR(255),
  year INTEGER
);
"#,
);

const USERS_CREATE: StatementTemplate = StatementTemplate::new(
    "create users",
    r#"
CREATE TABLE IF NOT EXISTS users (
  user_id INTEGER NOT NULL distkey sortkey,
  first_name VARCHAR(25) NOT NULL,
  last_name VARCHAR(25) NOT NULL,
  gender VARCHAR(1) NOT NULL,
  level VARCHAR(5) NOT NULL,
  primary key(user_id)
);
"#,
);

const SONGS_CREATE: StatementTemplate = StatementTemplate::new(
    "create songs",
    r#"
CREATE TABLE IF NOT EXISTS songs (
  song_id VARCHAR(25) NOT NULL distkey,
  title VARCHAR(255),
  artist_id VARCHAR(25) NOT NULL,
  year INTEGER NOT NULL,
  duration DOUBLE PRECISION NOT NULL,
  primary key(song_id)
);
"#,
);

const ARTISTS_CREATE: StatementTemplate = StatementTemplate::new(
    "create artists",
    r#"
CREATE TABLE IF NOT EXISTS artists (
  artist_id VARCHAR(25) NOT NULL distkey,
  name VARCHAR(255) NOT NULL,
  location VARCHAR(255),
  latitude DOUBLE PRECISION,
  longitude DOUBLE PRECISION,
  primary key(artist_id)
);
"#,
);

const TIME_CREATE: StatementTemplate = StatementTemplate::new(
    "create time",
    r#"
CREATE TABLE IF NOT EXISTS time (
  start_time TIMESTAMP NOT NULL distkey sortkey,
  hour INTEGER NOT NULL,
  day INTEGER NOT NULL,
  week INTEGER NOT NULL,
  month INTEGER NOT NULL,
  year INTEGER NOT NULL,
  weekday INTEGER NOT NULL,
  primary key(start_time)
);
"#,
);

const SONGPLAYS_CREATE: StatementTemplate = StatementTemplate::new(
    "create songplays",
    r#"
CREATE TABLE IF NOT EXISTS songplays (
  songplay_id INTEGER IDENTITY(1,1) NOT NULL,
  start_time TIMESTAMP NOT NULL,
  user_id INTEGER NOT NULL,
  level VARCHAR(5) NOT NULL,
  song_id VARCHAR(25) distkey,
  artist_id VARCHAR(25),
  session_id INTEGER NOT NULL,
  location VARCHAR(50) NOT NULL,
  user_agent VARCHAR(255) NOT NULL,
  primary key(songplay_id),
  foreign key(start_time) references time(start_time),
  foreign key(user_id) references users(user_id),
  foreign key(song_id) references songs(song_id),
  foreign key(artist_id) references artists(artist_id)
)
diststyle key
compound sortkey(user_id, artist_id, start_time);
"#,
);

/// Creation order: staging first, dimensions before the fact table.
pub const CREATE_TABLES: [StatementTemplate; 7] = [
    STAGING_EVENTS_CREATE,
    STAGING_SONGS_CREATE,
    USERS_CREATE,
    SONGS_CREATE,
    ARTISTS_CREATE,
    TIME_CREATE,
    SONGPLAYS_CREATE,
];

/// Drop order: strict reverse of `CREATE_TABLES`, so the fact table and
/// its foreign keys go before the dimensions they reference.
pub const DROP_TABLES: [StatementTemplate; 7] = [
    StatementTemplate::new("drop songplays", "DROP TABLE IF EXISTS songplays;"),
    StatementTemplate::new("drop time", "DROP TABLE IF EXISTS time;"),
    StatementTemplate::new("drop artists", "DROP TABLE IF EXISTS artists;"),
    StatementTemplate::new("drop songs", "DROP TABLE IF EXISTS songs;"),
    StatementTemplate::new("drop users", "DROP TABLE IF EXISTS users;"),
    StatementTemplate::new("drop staging_songs", "DROP TABLE IF EXISTS staging_songs;"),
    StatementTemplate::new("drop staging_events", "DROP TABLE IF EXISTS staging_events;"),
];

// Staging loads

pub const STAGING_EVENTS_COPY: StatementTemplate = StatementTemplate::new(
    "copy staging_events",
    r#"
COPY staging_events FROM '{events_uri}'
CREDENTIALS 'aws_iam_role={role_arn}'
REGION '{region}'
COMPUPDATE OFF STATUPDATE OFF
FORMAT AS JSON '{jsonpath_uri}'
TIMEFORMAT AS 'epochmillisecs';
"#,
);

pub const STAGING_SONGS_COPY: StatementTemplate = StatementTemplate::new(
    "copy staging_songs",
    r#"
COPY staging_songs FROM '{songs_uri}'
CREDENTIALS 'aws_iam_role={role_arn}'
REGION '{region}'
COMPUPDATE OFF STATUPDATE OFF
FORMAT AS JSON 'auto';
"#,
);

// Star-schema transforms

const SONGPLAYS_INSERT: StatementTemplate = StatementTemplate::new(
    "insert songplays",
    r#"
INSERT INTO songplays (
  start_time, user_id, level, song_id, artist_id, session_id, location, user_agent
)
SELECT
  e.ts, e.userId, e.level, s.song_id, s.artist_id, e.session_id, e.location, e.userAgent
FROM
  staging_events e
  INNER JOIN staging_songs s ON e.song = s.title AND e.artist = s.artist_name
WHERE e.page = 'NextSong'
GROUP BY
  e.ts, e.userId, e.level, s.song_id, s.artist_id, e.session_id, e.location, e.userAgent;
"#,
);

const USERS_INSERT: StatementTemplate = StatementTemplate::new(
    "insert users",
    r#"
INSERT INTO users (
  user_id, first_name, last_name, gender, level
)
SELECT
  userId, firstName, lastName, gender, level
FROM
  staging_events
WHERE
  page = 'NextSong'
GROUP BY
  userId, firstName, lastName, gender, level;
"#,
);

const SONGS_INSERT: StatementTemplate = StatementTemplate::new(
    "insert songs",
    r#"
INSERT INTO songs (
  song_id, title, artist_id, year, duration
)
SELECT
  song_id, title, artist_id, year, duration
FROM
  staging_songs
GROUP BY
  song_id, title, artist_id, year, duration;
"#,
);

const ARTISTS_INSERT: StatementTemplate = StatementTemplate::new(
    "insert artists",
    r#"
INSERT INTO artists (
  artist_id, name, location, latitude, longitude
)
SELECT
  artist_id, artist_name, artist_location, artist_latitude, artist_longitude
FROM
  staging_songs
GROUP BY
  artist_id, artist_name, artist_location, artist_latitude, artist_longitude;
"#,
);

// Derives distinct timestamps from songplays, so it must run after the
// songplays insert.
const TIME_INSERT: StatementTemplate = StatementTemplate::new(
    "insert time",
    r#"
INSERT INTO time (
  start_time,
  hour, day, week,
  month, year, weekday
)
WITH event_time AS (
  SELECT
    DISTINCT start_time
  FROM
    songplays
)
SELECT
  start_time,
  EXTRACT(hour from start_time), EXTRACT(day from start_time),
  EXTRACT(week from start_time), EXTRACT(month from start_time),
  EXTRACT(year from start_time), EXTRACT(dow from start_time)
FROM event_time;
"#,
);

/// Transform order. The fact table going first is required only by
/// `time`, which reads the timestamps `songplays` has already landed.
pub const TRANSFORMS: [StatementTemplate; 5] = [
    SONGPLAYS_INSERT,
    USERS_INSERT,
    SONGS_INSERT,
    ARTISTS_INSERT,
    TIME_INSERT,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_order_is_reverse_of_create_order() {
        // "create staging_events" / "drop staging_events" share a suffix.
        let created: Vec<&str> = CREATE_TABLES
            .iter()
            .map(|t| t.name().trim_start_matches("create "))
            .collect();
        let dropped: Vec<&str> = DROP_TABLES
            .iter()
            .rev()
            .map(|t| t.name().trim_start_matches("drop "))
            .collect();
        assert_eq!(created, dropped);
    }

    #[test]
    fn ddl_and_transforms_have_no_placeholders() {
        for t in CREATE_TABLES.iter().chain(DROP_TABLES.iter()).chain(TRANSFORMS.iter()) {
            assert!(t.render(&[]).is_ok(), "{} has placeholders", t.name());
        }
    }
}
