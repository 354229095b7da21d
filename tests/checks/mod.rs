pub mod report_tests;
