pub mod analyze_objectives_route;
