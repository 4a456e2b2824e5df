use std::{fs, path::Path};

use dumpconv_core::{ConvertConfig, ImportStats, Orchestrator};
use dumpconv_dialect_mysql::MysqlDialect;
use dumpconv_dialect_sqlite::SqliteDialect;
use rusqlite::Connection;
use tempfile::tempdir;

const DUMP: &str = r#"-- MySQL dump 10.13  Distrib 5.7.44, for Linux (x86_64)
/*!40101 SET @OLD_CHARACTER_SET_CLIENT=@@CHARACTER_SET_CLIENT */;
/*!40101 SET NAMES utf8 */;
SET FOREIGN_KEY_CHECKS=0;

--
-- Table structure for table `customers`
--

DROP TABLE IF EXISTS `customers`;
CREATE TABLE `customers` (
  `id` int(11) NOT NULL AUTO_INCREMENT,
  `name` varchar(64) COLLATE utf8_bin NOT NULL,
  `balance` double(10,2) DEFAULT '0.00',
  PRIMARY KEY (`id`),
  KEY `idx_name` (`name`)
) ENGINE=InnoDB AUTO_INCREMENT=3 DEFAULT CHARSET=utf8;

LOCK TABLES `customers` WRITE;
/*!40000 ALTER TABLE `customers` DISABLE KEYS */;
INSERT INTO `customers` VALUES (1,'O\'Brien',10.50),(2,'Said \"hi\"',0.00);
/*!40000 ALTER TABLE `customers` ENABLE KEYS */;
UNLOCK TABLES;

DROP TABLE IF EXISTS `orders`;
CREATE TABLE `orders` (
  `id` int(11) NOT NULL,
  `customer_id` int(11) NOT NULL,
  PRIMARY KEY (`id`),
  CONSTRAINT `fk_customer` FOREIGN KEY (`customer_id`) REFERENCES `customers` (`id`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8;

INSERT INTO `orders` VALUES (1,1),(2,2);
INSERT INTO `orders` VALUES (1,1);
INSERT INTO `missing` VALUES (1);
"#;

struct Snapshot {
    schema: Vec<String>,
    counts: Vec<(String, i64)>,
}

fn snapshot(path: &Path) -> Snapshot {
    let connection = Connection::open(path).expect("open converted store");
    let mut statement = connection
        .prepare("SELECT name, sql FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .expect("prepare catalog query");
    let tables: Vec<(String, String)> = statement
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .expect("query catalog")
        .collect::<Result<_, _>>()
        .expect("read catalog rows");

    let counts = tables
        .iter()
        .map(|(name, _)| {
            let count: i64 = connection
                .query_row(&format!("SELECT COUNT(*) FROM \"{name}\""), [], |row| row.get(0))
                .expect("count rows");
            (name.clone(), count)
        })
        .collect();

    Snapshot {
        schema: tables.into_iter().map(|(_, sql)| sql).collect(),
        counts,
    }
}

fn convert(input: &Path, output: &Path) -> ImportStats {
    Orchestrator::new(&MysqlDialect, &SqliteDialect)
        .run(&ConvertConfig::new(input, output))
        .unwrap_or_else(|error| panic!("conversion failed: {error}"))
}

#[test]
fn mysqldump_converts_into_a_queryable_store() {
    let tempdir = tempdir().unwrap_or_else(|error| panic!("failed to create tempdir: {error}"));
    let input = tempdir.path().join("import.sql");
    let output = tempdir.path().join("dental_data.db");
    fs::write(&input, DUMP).unwrap_or_else(|error| panic!("failed to write dump: {error}"));

    let stats = convert(&input, &output);

    assert_eq!(stats.statements_read, 8);
    assert_eq!(stats.tables_created, 2);
    assert_eq!(stats.tables_failed, 0);
    assert_eq!(stats.drops_applied, 2);
    assert_eq!(stats.inserts_applied, 2);
    assert_eq!(stats.inserts_failed, 2);
    assert_eq!(stats.suppressed_failures(), 2);

    let connection = Connection::open(&output).expect("open converted store");
    let mut statement = connection
        .prepare("SELECT name FROM customers ORDER BY id")
        .expect("prepare customer query");
    let names: Vec<String> = statement
        .query_map([], |row| row.get(0))
        .expect("query customers")
        .collect::<Result<_, _>>()
        .expect("read customer names");
    assert_eq!(names, vec!["O'Brien".to_string(), "Said \"hi\"".to_string()]);

    let schema = snapshot(&output).schema;
    assert_eq!(schema.len(), 2);
    assert!(schema[0].contains("`balance` REAL DEFAULT '0.00'"), "{}", schema[0]);
    assert!(!schema[0].contains("idx_name"), "{}", schema[0]);
    assert!(!schema[0].contains("AUTO_INCREMENT"), "{}", schema[0]);
    assert!(schema[1].contains("`customer_id` INTEGER NOT NULL"), "{}", schema[1]);
    assert!(!schema[1].contains("REFERENCES"), "{}", schema[1]);
}

#[test]
fn escaped_quote_insert_executes_against_existing_table() {
    let tempdir = tempdir().unwrap_or_else(|error| panic!("failed to create tempdir: {error}"));
    let input = tempdir.path().join("import.sql");
    let output = tempdir.path().join("out.db");
    fs::write(
        &input,
        "CREATE TABLE t (id int(11), v varchar(8));\nINSERT INTO t VALUES (1, 'a\\'b');\n",
    )
    .unwrap_or_else(|error| panic!("failed to write dump: {error}"));

    let stats = convert(&input, &output);

    assert_eq!(stats.inserts_applied, 1);
    assert_eq!(stats.inserts_failed, 0);
    let value: String = Connection::open(&output)
        .and_then(|connection| connection.query_row("SELECT v FROM t WHERE id = 1", [], |row| row.get(0)))
        .expect("read inserted value");
    assert_eq!(value, "a'b");
}

#[test]
fn rerunning_the_same_dump_rebuilds_an_identical_store() {
    let tempdir = tempdir().unwrap_or_else(|error| panic!("failed to create tempdir: {error}"));
    let input = tempdir.path().join("import.sql");
    let output = tempdir.path().join("dental_data.db");
    fs::write(&input, DUMP).unwrap_or_else(|error| panic!("failed to write dump: {error}"));

    let first_stats = convert(&input, &output);
    let first = snapshot(&output);
    let second_stats = convert(&input, &output);
    let second = snapshot(&output);

    assert_eq!(first_stats, second_stats);
    assert_eq!(first.schema, second.schema);
    assert_eq!(first.counts, second.counts);
    assert_eq!(
        second.counts,
        vec![("customers".to_string(), 2), ("orders".to_string(), 2)]
    );
}
