pub mod text_chart;
