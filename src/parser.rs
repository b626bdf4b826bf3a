use crate::ast::{self, Expression, Operator, Statement};
use crate::lexer::Lexer;
use crate::token::{Token, TokenType};

/// Binding strengths for the Pratt expression loop, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

impl From<&Token> for Precedence {
    fn from(token: &Token) -> Self {
        match token {
            Token::Eq | Token::NotEq => Self::Equals,
            Token::LT | Token::GT => Self::LessGreater,
            Token::Plus | Token::Minus => Self::Sum,
            Token::Slash | Token::Asterisk => Self::Product,
            Token::LParen => Self::Call,
            Token::LBracket => Self::Index,
            _ => Self::Lowest,
        }
    }
}

pub struct Parser {
    lexer: Lexer,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<String>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let cur_token = lexer.next_token();
        let peek_token = lexer.next_token();

        Self {
            lexer,
            cur_token,
            peek_token,
            errors: vec![],
        }
    }

    fn next_token(&mut self) {
        self.cur_token = std::mem::replace(&mut self.peek_token, self.lexer.next_token());
    }

    pub fn parse_program(mut self) -> Result<ast::Program, Vec<String>> {
        let mut program = ast::Program::default();

        while !self.cur_token.is(TokenType::Eof) {
            if let Some(stmt) = self.parse_statement() {
                program.statements.push(stmt)
            }
            self.next_token();
        }

        if self.errors.is_empty() {
            Ok(program)
        } else {
            Err(self.errors)
        }
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match &self.cur_token {
            Token::Let => self.parse_let_statement().map(Statement::Let),
            Token::Return => self.parse_return_statement().map(Statement::Return),
            Token::LBrace => self.parse_block_statement().map(Statement::Block),
            _ => self.parse_expression_statement().map(Statement::Expr),
        }
    }

    fn parse_let_statement(&mut self) -> Option<ast::LetStatement> {
        if !self.expect_peek(TokenType::Ident) {
            return None;
        }

        let name: ast::Identifier = self.cur_token.clone().into();

        if !self.expect_peek(TokenType::Assign) {
            return None;
        }
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token.is(TokenType::Semicolon) {
            self.next_token();
        }

        Some(ast::LetStatement { name, value })
    }

    fn parse_return_statement(&mut self) -> Option<ast::ReturnStatement> {
        self.next_token();

        let return_value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token.is(TokenType::Semicolon) {
            self.next_token();
        }

        Some(ast::ReturnStatement { return_value })
    }

    fn parse_expression_statement(&mut self) -> Option<ast::ExpressionStatement> {
        let expression = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token.is(TokenType::Semicolon) {
            self.next_token();
        }

        Some(ast::ExpressionStatement { expression })
    }

    // Leaves cur_token on the closing brace.
    fn parse_block_statement(&mut self) -> Option<ast::BlockStatement> {
        let mut statements = vec![];

        self.next_token();
        while !self.cur_token.is(TokenType::RBrace) {
            if self.cur_token.is(TokenType::Eof) {
                self.errors
                    .push("expected RBrace before end of input".to_owned());
                return None;
            }
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }

        Some(statements.into())
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while !self.peek_token.is(TokenType::Semicolon) && precedence < self.peek_precedence() {
            self.next_token();
            left = self.parse_infix(left)?;
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match &self.cur_token {
            Token::Ident(value) => Some(Expression::Identifier(ast::Identifier {
                value: value.clone(),
            })),
            Token::Int(literal) => {
                let literal = literal.clone();
                self.parse_integer_literal(&literal)
            }
            Token::String(value) => Some(Expression::String(value.clone())),
            Token::True | Token::False => {
                Some(Expression::Boolean(self.cur_token.clone().into()))
            }
            Token::Bang | Token::Minus => self.parse_prefix_expression().map(Expression::Prefix),
            Token::LParen => self.parse_grouped_expression(),
            Token::If => self.parse_if_expression().map(Expression::If),
            Token::Function => self.parse_function_literal().map(Expression::Function),
            Token::LBracket => self.parse_array_literal().map(Expression::Array),
            Token::LBrace => self.parse_hash_literal().map(Expression::Hash),
            token => {
                self.errors
                    .push(format!("no prefix parse function for {} found", token));
                None
            }
        }
    }

    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        match &self.cur_token {
            Token::LParen => self.parse_call_expression(left).map(Expression::Call),
            Token::LBracket => self.parse_index_expression(left).map(Expression::Index),
            _ => self.parse_infix_expression(left).map(Expression::Infix),
        }
    }

    fn parse_integer_literal(&mut self, literal: &str) -> Option<Expression> {
        match literal.parse() {
            Ok(value) => Some(Expression::IntegerLiteral(value)),
            Err(_) => {
                self.errors
                    .push(format!("could not parse {} as integer", literal));
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<ast::PrefixExpression> {
        let operator = Operator::from(self.cur_token.clone());

        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;

        Some(ast::PrefixExpression {
            operator,
            right: Box::new(right),
        })
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<ast::InfixExpression> {
        let operator = Operator::from(self.cur_token.clone());
        let precedence = self.cur_precedence();

        self.next_token();
        let right = self.parse_expression(precedence)?;

        Some(ast::InfixExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();

        let expression = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::RParen) {
            return None;
        }

        Some(expression)
    }

    fn parse_if_expression(&mut self) -> Option<ast::IfExpression> {
        if !self.expect_peek(TokenType::LParen) {
            return None;
        }
        self.next_token();

        let condition = Box::new(self.parse_expression(Precedence::Lowest)?);

        if !self.expect_peek(TokenType::RParen) {
            return None;
        }
        if !self.expect_peek(TokenType::LBrace) {
            return None;
        }

        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek_token.is(TokenType::Else) {
            self.next_token();
            if !self.expect_peek(TokenType::LBrace) {
                return None;
            }
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Some(ast::IfExpression {
            condition,
            consequence,
            alternative,
        })
    }

    fn parse_function_literal(&mut self) -> Option<ast::FunctionLiteral> {
        if !self.expect_peek(TokenType::LParen) {
            return None;
        }

        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenType::LBrace) {
            return None;
        }

        let body = self.parse_block_statement()?;

        Some(ast::FunctionLiteral { parameters, body })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<ast::Identifier>> {
        let mut parameters = vec![];

        if self.peek_token.is(TokenType::RParen) {
            self.next_token();
            return Some(parameters);
        }

        if !self.expect_peek(TokenType::Ident) {
            return None;
        }
        parameters.push(self.cur_token.clone().into());

        while self.peek_token.is(TokenType::Comma) {
            self.next_token();
            if !self.expect_peek(TokenType::Ident) {
                return None;
            }
            parameters.push(self.cur_token.clone().into());
        }

        if !self.expect_peek(TokenType::RParen) {
            return None;
        }

        Some(parameters)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<ast::CallExpression> {
        let arguments = self.parse_expression_list(TokenType::RParen)?;

        Some(ast::CallExpression {
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<ast::IndexExpression> {
        self.next_token();

        let index = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::RBracket) {
            return None;
        }

        Some(ast::IndexExpression {
            left: Box::new(left),
            index: Box::new(index),
        })
    }

    fn parse_array_literal(&mut self) -> Option<ast::ArrayLiteral> {
        self.parse_expression_list(TokenType::RBracket)
            .map(ast::ArrayLiteral::from)
    }

    fn parse_hash_literal(&mut self) -> Option<ast::HashLiteral> {
        let mut pairs = vec![];

        while !self.peek_token.is(TokenType::RBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_peek(TokenType::Colon) {
                return None;
            }
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;

            pairs.push((key, value));

            if !self.peek_token.is(TokenType::RBrace) && !self.expect_peek(TokenType::Comma) {
                return None;
            }
        }

        if !self.expect_peek(TokenType::RBrace) {
            return None;
        }

        Some(pairs.into())
    }

    fn parse_expression_list(&mut self, end: TokenType) -> Option<Vec<Expression>> {
        let mut list = vec![];

        if self.peek_token.is(end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token.is(TokenType::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::from(&self.peek_token)
    }

    fn cur_precedence(&self) -> Precedence {
        Precedence::from(&self.cur_token)
    }

    fn expect_peek(&mut self, expected: TokenType) -> bool {
        if self.peek_token.is(expected) {
            self.next_token();
            true
        } else {
            self.peek_error(expected);
            false
        }
    }

    fn peek_error(&mut self, expected: TokenType) {
        self.errors.push(format!(
            "expected next token to be {:?}, got {:?} instead",
            expected,
            TokenType::from(&self.peek_token)
        ));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(input: &str) -> ast::Program {
        Parser::new(Lexer::new(input.to_owned()))
            .parse_program()
            .expect("Parse errors found")
    }

    fn parse_single_expression(input: &str) -> Expression {
        let program = parse(input);
        assert_eq!(program.statements.len(), 1);

        match program.statements.into_iter().next().unwrap() {
            Statement::Expr(stmt) => stmt.expression,
            stmt => panic!("expected expression statement, got {:?}", stmt),
        }
    }

    #[test]
    fn test_let_statements() {
        let cases = vec![
            ("let x = 5;", "x", Expression::IntegerLiteral(5)),
            ("let y = true;", "y", Expression::Boolean(true.into())),
            (
                "let foobar = y;",
                "foobar",
                Expression::Identifier("y".into()),
            ),
        ];

        for (input, name, value) in cases.into_iter() {
            let program = parse(input);
            assert_eq!(program.statements.len(), 1);

            match &program.statements[0] {
                Statement::Let(stmt) => {
                    assert_eq!(stmt.name.value, name);
                    assert_eq!(stmt.value, value);
                }
                stmt => panic!("expected let statement, got {:?}", stmt),
            }
        }
    }

    #[test]
    fn test_let_statement_errors() {
        let errors = Parser::new(Lexer::new("let x 5; let = 10; let 838383;".to_owned()))
            .parse_program()
            .expect_err("expected parse errors");

        assert!(errors.contains(&"expected next token to be Assign, got Int instead".to_owned()));
        assert!(errors.contains(&"expected next token to be Ident, got Assign instead".to_owned()));
        assert!(errors.contains(&"expected next token to be Ident, got Int instead".to_owned()));
    }

    #[test]
    fn test_return_statements() {
        let input = "return 5; return 10; return add(15);";
        let program = parse(input);

        assert_eq!(program.statements.len(), 3);
        assert_eq!(program.statements[0].to_string(), "return 5;");
        assert_eq!(program.statements[1].to_string(), "return 10;");

        for stmt in program.statements.iter() {
            match stmt {
                Statement::Return(_) => {}
                stmt => panic!("expected return statement, got {:?}", stmt),
            }
        }
    }

    #[test]
    fn test_identifier_expression() {
        assert_eq!(
            parse_single_expression("foobar;"),
            Expression::Identifier("foobar".into())
        );
    }

    #[test]
    fn test_integer_literal_expression() {
        assert_eq!(parse_single_expression("5;"), Expression::IntegerLiteral(5));
    }

    #[test]
    fn test_string_literal_expression() {
        assert_eq!(
            parse_single_expression("\"hello world\";"),
            Expression::String("hello world".to_owned())
        );
    }

    #[test]
    fn test_boolean_expression() {
        assert_eq!(
            parse_single_expression("true;"),
            Expression::Boolean(true.into())
        );
        assert_eq!(
            parse_single_expression("false;"),
            Expression::Boolean(false.into())
        );
    }

    #[test]
    fn test_prefix_expressions() {
        let cases = vec![
            ("!5;", Operator::Bang, Expression::IntegerLiteral(5)),
            ("-15;", Operator::Minus, Expression::IntegerLiteral(15)),
            ("!true;", Operator::Bang, Expression::Boolean(true.into())),
            ("!false;", Operator::Bang, Expression::Boolean(false.into())),
        ];

        for (input, operator, right) in cases.into_iter() {
            match parse_single_expression(input) {
                Expression::Prefix(prefix) => {
                    assert_eq!(prefix.operator, operator);
                    assert_eq!(*prefix.right, right);
                }
                expr => panic!("expected prefix expression, got {:?}", expr),
            }
        }
    }

    #[test]
    fn test_infix_expressions() {
        let cases = vec![
            ("5 + 5;", 5, Operator::Plus, 5),
            ("5 - 5;", 5, Operator::Minus, 5),
            ("5 * 5;", 5, Operator::Asterisk, 5),
            ("5 / 5;", 5, Operator::Slash, 5),
            ("5 > 5;", 5, Operator::GT, 5),
            ("5 < 5;", 5, Operator::LT, 5),
            ("5 == 5;", 5, Operator::Eq, 5),
            ("5 != 5;", 5, Operator::NotEq, 5),
        ];

        for (input, left, operator, right) in cases.into_iter() {
            match parse_single_expression(input) {
                Expression::Infix(infix) => {
                    assert_eq!(*infix.left, Expression::IntegerLiteral(left));
                    assert_eq!(infix.operator, operator);
                    assert_eq!(*infix.right, Expression::IntegerLiteral(right));
                }
                expr => panic!("expected infix expression, got {:?}", expr),
            }
        }
    }

    #[test]
    fn test_operator_precedence() {
        let cases = vec![
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            ("1 + 2 * 3", "(1 + (2 * 3))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("true", "true"),
            ("false", "false"),
            ("3 > 5 == false", "((3 > 5) == false)"),
            ("3 < 5 == true", "((3 < 5) == true)"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("2 / (5 + 5)", "(2 / (5 + 5))"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            (
                "add(a + b + c * d / f + g)",
                "add((((a + b) + ((c * d) / f)) + g))",
            ),
            (
                "a * [1, 2, 3, 4][b * c] * d",
                "((a * ([1, 2, 3, 4][(b * c)])) * d)",
            ),
            (
                "add(a * b[2], b[1], 2 * [1, 2][1])",
                "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))",
            ),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(parse(input).to_string(), expected);
        }
    }

    #[test]
    fn test_if_expression() {
        match parse_single_expression("if (x < y) { x }") {
            Expression::If(expr) => {
                assert_eq!(expr.condition.to_string(), "(x < y)");
                assert_eq!(expr.consequence.statements.len(), 1);
                assert_eq!(expr.consequence.statements[0].to_string(), "x");
                assert!(expr.alternative.is_none());
            }
            expr => panic!("expected if expression, got {:?}", expr),
        }
    }

    #[test]
    fn test_if_else_expression() {
        match parse_single_expression("if (x < y) { x } else { y }") {
            Expression::If(expr) => {
                assert_eq!(expr.condition.to_string(), "(x < y)");
                assert_eq!(expr.consequence.statements[0].to_string(), "x");
                let alternative = expr.alternative.expect("expected alternative block");
                assert_eq!(alternative.statements[0].to_string(), "y");
            }
            expr => panic!("expected if expression, got {:?}", expr),
        }
    }

    #[test]
    fn test_block_statement() {
        let program = parse("{ let x = 5; x }");
        assert_eq!(program.statements.len(), 1);

        match &program.statements[0] {
            Statement::Block(block) => {
                assert_eq!(block.statements.len(), 2);
                assert_eq!(block.statements[0].to_string(), "let x = 5;");
            }
            stmt => panic!("expected block statement, got {:?}", stmt),
        }
    }

    #[test]
    fn test_unterminated_block() {
        let errors = Parser::new(Lexer::new("if (x) { y".to_owned()))
            .parse_program()
            .expect_err("expected parse errors");

        assert!(errors.contains(&"expected RBrace before end of input".to_owned()));
    }

    #[test]
    fn test_function_literal() {
        match parse_single_expression("fn(x, y) { x + y; }") {
            Expression::Function(func) => {
                let names: Vec<String> = func.parameters.iter().map(|p| p.value.clone()).collect();
                assert_eq!(names, vec!["x", "y"]);
                assert_eq!(func.body.statements.len(), 1);
                assert_eq!(func.body.statements[0].to_string(), "(x + y)");
            }
            expr => panic!("expected function literal, got {:?}", expr),
        }
    }

    #[test]
    fn test_function_parameters() {
        let cases = vec![
            ("fn() {};", vec![]),
            ("fn(x) {};", vec!["x"]),
            ("fn(x, y, z) {};", vec!["x", "y", "z"]),
        ];

        for (input, expected) in cases.into_iter() {
            match parse_single_expression(input) {
                Expression::Function(func) => {
                    let names: Vec<String> =
                        func.parameters.iter().map(|p| p.value.clone()).collect();
                    assert_eq!(names, expected);
                }
                expr => panic!("expected function literal, got {:?}", expr),
            }
        }
    }

    #[test]
    fn test_call_expression() {
        match parse_single_expression("add(1, 2 * 3, 4 + 5);") {
            Expression::Call(call) => {
                assert_eq!(*call.function, Expression::Identifier("add".into()));
                assert_eq!(call.arguments.len(), 3);
                assert_eq!(call.arguments[0], Expression::IntegerLiteral(1));
                assert_eq!(call.arguments[1].to_string(), "(2 * 3)");
                assert_eq!(call.arguments[2].to_string(), "(4 + 5)");
            }
            expr => panic!("expected call expression, got {:?}", expr),
        }
    }

    #[test]
    fn test_array_literal() {
        match parse_single_expression("[1, 2 * 2, 3 + 3]") {
            Expression::Array(array) => {
                assert_eq!(array.elements.len(), 3);
                assert_eq!(array.elements[0], Expression::IntegerLiteral(1));
                assert_eq!(array.elements[1].to_string(), "(2 * 2)");
                assert_eq!(array.elements[2].to_string(), "(3 + 3)");
            }
            expr => panic!("expected array literal, got {:?}", expr),
        }
    }

    #[test]
    fn test_index_expression() {
        match parse_single_expression("myArray[1 + 1]") {
            Expression::Index(index) => {
                assert_eq!(*index.left, Expression::Identifier("myArray".into()));
                assert_eq!(index.index.to_string(), "(1 + 1)");
            }
            expr => panic!("expected index expression, got {:?}", expr),
        }
    }

    #[test]
    fn test_hash_literal() {
        let program = parse("let h = {\"one\": 1, \"two\": 2, \"three\": 3};");

        let value = match &program.statements[0] {
            Statement::Let(stmt) => &stmt.value,
            stmt => panic!("expected let statement, got {:?}", stmt),
        };

        match value {
            Expression::Hash(hash) => {
                let expected = vec![("one", 1), ("two", 2), ("three", 3)];
                assert_eq!(hash.pairs.len(), expected.len());

                for ((key, value), (expected_key, expected_value)) in
                    hash.pairs.iter().zip(expected)
                {
                    assert_eq!(key, &Expression::String(expected_key.to_owned()));
                    assert_eq!(value, &Expression::IntegerLiteral(expected_value));
                }
            }
            expr => panic!("expected hash literal, got {:?}", expr),
        }
    }

    #[test]
    fn test_empty_hash_literal() {
        let program = parse("let h = {};");

        match &program.statements[0] {
            Statement::Let(stmt) => match &stmt.value {
                Expression::Hash(hash) => assert!(hash.pairs.is_empty()),
                expr => panic!("expected hash literal, got {:?}", expr),
            },
            stmt => panic!("expected let statement, got {:?}", stmt),
        }
    }

    #[test]
    fn test_hash_literal_with_expressions() {
        let program = parse("let h = {\"one\": 0 + 1, \"two\": 10 - 8};");

        match &program.statements[0] {
            Statement::Let(stmt) => match &stmt.value {
                Expression::Hash(hash) => {
                    assert_eq!(hash.pairs[0].1.to_string(), "(0 + 1)");
                    assert_eq!(hash.pairs[1].1.to_string(), "(10 - 8)");
                }
                expr => panic!("expected hash literal, got {:?}", expr),
            },
            stmt => panic!("expected let statement, got {:?}", stmt),
        }
    }

    #[test]
    fn test_round_trip() {
        let cases = vec![
            "let x = 5;",
            "return 10;",
            "1 + 2 * 3",
            "!5",
            "-15",
            "if (x < y) { x } else { y }",
            "fn(x, y) { x + y; }(1, 2)",
            "[1, 2 * 2, 3 + 3]",
            "let h = {1: 2, true: 3};",
            "!(true == false)",
        ];

        for input in cases.into_iter() {
            let first = parse(input);
            let second = parse(&first.to_string());
            assert_eq!(first, second, "round trip changed the tree for {}", input);
        }
    }
}
