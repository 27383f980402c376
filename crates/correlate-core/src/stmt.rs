mod alias;
pub use alias::Alias;

mod comparator;
pub use comparator::Comparator;

mod direction;
pub use direction::Direction;

mod expr;
pub use expr::Expr;

mod expr_and;
pub use expr_and::ExprAnd;

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_in_list;
pub use expr_in_list::ExprInList;

mod expr_in_subquery;
pub use expr_in_subquery::ExprInSubquery;

mod expr_is_null;
pub use expr_is_null::ExprIsNull;

mod expr_not;
pub use expr_not::ExprNot;

mod expr_or;
pub use expr_or::ExprOr;

mod expr_param;
pub use expr_param::ExprParam;

mod expr_path;
pub use expr_path::ExprPath;

mod join;
pub use join::{Join, JoinKind};

mod limit;
pub use limit::Limit;

mod op_binary;
pub use op_binary::BinaryOp;

mod order_by_expr;
pub use order_by_expr::OrderByExpr;

mod params;
pub use params::Params;

mod query;
pub use query::Query;

mod reference;
pub use reference::Reference;

mod source;
pub use source::{Source, SourceKeys, SourceTable};

mod value;
pub use value::Value;

mod value_cmp;

mod value_map;
pub use value_map::ValueMap;

mod value_record;
pub use value_record::ValueRecord;

mod value_recording;
pub use value_recording::{ChangeAction, RecordingContainer};

mod value_set;
pub use value_set::ValueSet;

mod value_sorted_set;
pub use value_sorted_set::ValueSortedSet;

mod value_stream;
pub use value_stream::ValueStream;
