use super::*;
use crate::policy::products::{currency_glyph, parse_price};

fn shirt(price: f64) -> ProductRecord {
    ProductRecord {
        brand: "Allen Solly".to_string(),
        name: format!("Shirt at {price}"),
        price,
        price_display: format!("₹{price:.2}"),
        mrp_display: None,
        offer: None,
    }
}

mod products {
    use super::*;

    #[test]
    fn parses_catalog_document_text() {
        let text = "brand: Allen Solly\nname: Slim Fit Shirt\nprice: ₹499.00\nmrp: ₹999.00\noffer: 50% off";
        let product = ProductRecord::parse(text).expect("should parse product");

        assert_eq!(product.brand, "Allen Solly");
        assert_eq!(product.name, "Slim Fit Shirt");
        assert!((product.price - 499.0).abs() < f64::EPSILON);
        assert_eq!(product.price_display, "₹499.00");
        assert_eq!(product.mrp_display.as_deref(), Some("₹999.00"));
        assert_eq!(product.offer.as_deref(), Some("50% off"));
    }

    #[test]
    fn header_aliases_are_recognized() {
        let text = "Brand Name: Titan\nProduct Name: Neo Watch\nPrice: ₹2,499.00";
        let product = ProductRecord::parse(text).expect("should parse product");

        assert_eq!(product.brand, "Titan");
        assert_eq!(product.name, "Neo Watch");
        assert!((product.price - 2499.0).abs() < f64::EPSILON);
    }

    #[test]
    fn non_product_text_is_rejected() {
        assert!(ProductRecord::parse("just some prose with no fields").is_none());
        assert!(ProductRecord::parse("name: thing without a price").is_none());
    }

    #[test]
    fn price_parsing() {
        assert_eq!(parse_price("₹1,299.00"), Some(1299.0));
        assert_eq!(parse_price("free"), None);
    }

    #[test]
    fn price_prefix_punctuation_is_not_part_of_the_number() {
        // The dot in "Rs." belongs to the currency prefix, not the amount.
        assert_eq!(parse_price("Rs. 450"), Some(450.0));
        assert_eq!(parse_price("Rs.2,499.50"), Some(2499.5));
    }

    #[test]
    fn currency_glyph_extraction() {
        assert_eq!(currency_glyph("₹499.00"), "₹");
        assert_eq!(currency_glyph("Rs. 450"), "Rs.");
        // The catalog currency is rupees; a bare number keeps the glyph.
        assert_eq!(currency_glyph("450"), "₹");
    }
}

mod pricing {
    use super::*;

    fn catalog() -> Vec<ProductRecord> {
        vec![shirt(300.0), shirt(450.0), shirt(600.0), shirt(900.0)]
    }

    #[test]
    fn under_bound_filters_catalog() {
        let range = PriceRange::parse("Recommend me a shirt under rupees 500")
            .expect("should parse range");
        assert_eq!(range, PriceRange::new(None, Some(500.0)));

        let products = catalog();
        let eligible = range.filter_products(&products);
        let prices: Vec<f64> = eligible.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![300.0, 450.0]);
    }

    #[test]
    fn between_bounds_filter_catalog() {
        let range = PriceRange::parse("show me shirts between 500 and 900")
            .expect("should parse range");
        assert_eq!(range, PriceRange::new(Some(500.0), Some(900.0)));

        let products = catalog();
        let eligible = range.filter_products(&products);
        let prices: Vec<f64> = eligible.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![600.0, 900.0]);
    }

    #[test]
    fn combined_upper_and_lower_bounds() {
        let range = PriceRange::parse("a shirt under rupees 1000 and above rupees 500")
            .expect("should parse range");
        assert_eq!(range, PriceRange::new(Some(500.0), Some(1000.0)));
    }

    #[test]
    fn reversed_between_bounds_are_normalized() {
        let range = PriceRange::parse("between 900 and 500").expect("should parse range");
        assert_eq!(range, PriceRange::new(Some(500.0), Some(900.0)));
    }

    #[test]
    fn bounds_are_inclusive() {
        let range = PriceRange::new(Some(500.0), Some(900.0));
        assert!(range.contains(500.0));
        assert!(range.contains(900.0));
        assert!(!range.contains(499.99));
        assert!(!range.contains(900.01));
    }

    #[test]
    fn text_without_constraint_parses_to_none() {
        assert_eq!(PriceRange::parse("do you have sarees?"), None);
        assert_eq!(PriceRange::parse("recommend me a watch"), None);
    }
}

mod orders {
    use super::*;

    #[test]
    fn order_ids_are_sequential_without_gaps() {
        let mut ledger = OrderLedger::new();

        for expected in 1..=4 {
            let order = ledger
                .place_order(vec![LineItem::new("Slim Fit Shirt", 1, 499.0)])
                .expect("order should be placed");
            assert_eq!(order.order_id, format!("Order-No-{expected}"));
        }

        assert_eq!(ledger.orders().len(), 4);
    }

    #[test]
    fn eleven_units_are_refused_without_an_order_id() {
        let mut ledger = OrderLedger::new();

        let refusal = ledger
            .place_order(vec![LineItem::new("Neo Watch", 11, 2499.0)])
            .expect_err("order should be refused");

        assert_eq!(
            refusal.to_string(),
            "Currently we have only 10 pieces of Neo Watch"
        );
        assert_eq!(ledger.orders().len(), 0);

        // The counter did not advance: the next order is still number 1.
        let order = ledger
            .place_order(vec![LineItem::new("Neo Watch", 10, 2499.0)])
            .expect("ten units fit the ceiling");
        assert_eq!(order.order_id, "Order-No-1");
    }

    #[test]
    fn ceiling_applies_per_product_not_per_order() {
        let mut ledger = OrderLedger::new();

        // 18 units across two products is fine; no single product exceeds 10.
        let order = ledger
            .place_order(vec![
                LineItem::new("Slim Fit Shirt", 9, 499.0),
                LineItem::new("Silk Saree", 9, 1500.0),
            ])
            .expect("order should be placed");
        assert_eq!(order.line_items.len(), 2);
    }

    #[test]
    fn stock_depletes_across_orders_in_one_session() {
        let mut ledger = OrderLedger::new();

        ledger
            .place_order(vec![LineItem::new("Silk Saree", 8, 1500.0)])
            .expect("first order fits");
        assert_eq!(ledger.remaining_stock("Silk Saree"), 2);

        let refusal = ledger
            .place_order(vec![LineItem::new("Silk Saree", 5, 1500.0)])
            .expect_err("only two left");
        assert_eq!(
            refusal,
            OrderRefusal::InsufficientStock {
                product: "Silk Saree".to_string(),
                remaining: 2
            }
        );

        ledger
            .place_order(vec![LineItem::new("Silk Saree", 2, 1500.0)])
            .expect("remaining stock fits");
        let refusal = ledger
            .place_order(vec![LineItem::new("Silk Saree", 1, 1500.0)])
            .expect_err("now out of stock");
        assert!(matches!(refusal, OrderRefusal::OutOfStock { .. }));
    }

    #[test]
    fn tax_is_five_percent_of_exact_subtotal() {
        let order = Order {
            order_id: "Order-No-1".to_string(),
            line_items: vec![
                LineItem::new("Slim Fit Shirt", 2, 333.33),
                LineItem::new("Silk Saree", 1, 333.34),
            ],
        };

        assert!((order.subtotal() - 1000.0).abs() < 1e-9);
        assert!((order.tax() - 50.0).abs() < 1e-9);
        assert!((order.total() - 1050.0).abs() < 1e-9);
    }

    #[test]
    fn empty_order_is_refused() {
        let mut ledger = OrderLedger::new();
        assert_eq!(
            ledger.place_order(Vec::new()),
            Err(OrderRefusal::EmptyOrder)
        );
    }

    #[test]
    fn fill_pending_order_id_substitutes_and_counts() {
        let mut ledger = OrderLedger::new();

        let reply = format!("Your order is confirmed.\nOrder ID: {ORDER_ID_PLACEHOLDER}");
        let filled = ledger.fill_pending_order_id(&reply);
        assert!(filled.contains("Order ID: Order-No-1"));
        assert!(!filled.contains(ORDER_ID_PLACEHOLDER));

        let filled = ledger.fill_pending_order_id(&reply);
        assert!(filled.contains("Order ID: Order-No-2"));

        // A reply without the marker mints nothing.
        let untouched = ledger.fill_pending_order_id("Thanks for shopping!");
        assert_eq!(untouched, "Thanks for shopping!");
        let filled = ledger.fill_pending_order_id(&reply);
        assert!(filled.contains("Order ID: Order-No-3"));
    }

    #[test]
    fn each_pending_marker_gets_its_own_order_id() {
        let mut ledger = OrderLedger::new();

        let reply = format!(
            "First order: {ORDER_ID_PLACEHOLDER}\nSecond order: {ORDER_ID_PLACEHOLDER}"
        );
        let filled = ledger.fill_pending_order_id(&reply);

        assert!(filled.contains("First order: Order-No-1"));
        assert!(filled.contains("Second order: Order-No-2"));
        assert!(!filled.contains(ORDER_ID_PLACEHOLDER));

        // The next marker continues the sequence.
        let filled = ledger.fill_pending_order_id(ORDER_ID_PLACEHOLDER);
        assert_eq!(filled, "Order-No-3");
    }

    #[test]
    fn knows_order_tracks_minted_ids() {
        let mut ledger = OrderLedger::new();
        ledger
            .place_order(vec![LineItem::new("Slim Fit Shirt", 1, 499.0)])
            .expect("order should be placed");

        assert!(ledger.knows_order("Order-No-1"));
        assert!(!ledger.knows_order("Order-No-7"));
        assert!(!ledger.knows_order("Order-No-0"));
        assert!(!ledger.knows_order(ORDER_ID_PLACEHOLDER));
    }

    #[test]
    fn ids_minted_by_filling_a_reply_are_known() {
        let mut ledger = OrderLedger::new();
        ledger.fill_pending_order_id(&format!("Order ID: {ORDER_ID_PLACEHOLDER}"));

        assert!(ledger.knows_order("Order-No-1"));
        assert!(!ledger.knows_order("Order-No-2"));
    }

    #[test]
    fn order_ids_are_found_in_free_text() {
        assert_eq!(
            find_order_id("what happened to Order-No-3?"),
            Some("Order-No-3".to_string())
        );
        assert_eq!(find_order_id("where is my order?"), None);
        // The pending marker is not a real id.
        assert_eq!(find_order_id(ORDER_ID_PLACEHOLDER), None);
    }
}

mod prompt {
    use super::*;

    #[test]
    fn system_prompt_embeds_context() {
        let rendered = system_prompt("brand: Titan\nname: Neo Watch\nprice: ₹2,499.00");
        assert!(rendered.contains("name: Neo Watch"));
        assert!(!rendered.contains("{context}"));
    }

    #[test]
    fn system_prompt_states_the_core_rules() {
        let rendered = system_prompt("");
        assert!(rendered.contains("10 pieces"));
        assert!(rendered.contains("5%"));
        assert!(rendered.contains(ORDER_ID_PLACEHOLDER));
        assert!(rendered.contains("never substitute the rupee symbol"));
    }

    #[test]
    fn status_reply_is_fixed() {
        let reply = order_status_reply("Order-No-3");
        assert_eq!(
            reply,
            "Your order Order-No-3 is confirmed and is currently being processed. You should receive a shipping confirmation email with tracking information."
        );
    }
}

mod render {
    use super::*;
    use crate::policy::render::{render_invoice, render_recommendation};

    #[test]
    fn recommendation_block_is_field_aligned() {
        let mut product = shirt(499.0);
        product.name = "Slim Fit Shirt".to_string();
        product.mrp_display = Some("₹999.00".to_string());
        product.offer = Some("50% off".to_string());

        let block = render_recommendation(&product);
        let lines: Vec<&str> = block.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Brand name :    Allen Solly");
        assert_eq!(lines[1], "Product name:   Slim Fit Shirt");
        assert_eq!(lines[2], "Price:          ₹499.00");
        assert_eq!(lines[3], "MRP:            ₹999.00");
        assert_eq!(lines[4], "Offer:          50% off");
    }

    #[test]
    fn missing_fields_render_as_not_available() {
        let block = render_recommendation(&shirt(300.0));
        assert!(block.contains("MRP:            not available"));
        assert!(block.contains("Offer:          not available"));
    }

    #[test]
    fn invoice_layout_and_totals() {
        let order = Order {
            order_id: "Order-No-1".to_string(),
            line_items: vec![
                LineItem::new("Slim Fit Shirt", 1, 499.0),
                LineItem::new("Silk Saree", 2, 1500.0),
            ],
        };

        let invoice = render_invoice(&order, "₹499.00");
        let lines: Vec<&str> = invoice.lines().collect();

        assert_eq!(lines[0], "Order Invoice");
        // Four divider rules: under the title, under the column header,
        // before the subtotal block, and before the total.
        let dividers = lines.iter().filter(|l| l.starts_with('─')).count();
        assert_eq!(dividers, 4);

        assert!(invoice.contains("Item                     Qty    Price"));
        assert!(invoice.contains("Slim Fit Shirt           x1     ₹499.00"));
        assert!(invoice.contains("Silk Saree               x2     ₹3000.00"));
        assert!(invoice.contains("Subtotal:                       ₹3499.00"));
        assert!(invoice.contains("Tax (5%):                       ₹174.95"));
        assert!(invoice.contains("Total:                          ₹3673.95"));
        assert!(invoice.ends_with("Order ID: Order-No-1"));
    }

    #[test]
    fn invoice_keeps_catalog_currency_glyph() {
        let order = Order {
            order_id: "Order-No-2".to_string(),
            line_items: vec![LineItem::new("Neo Watch", 1, 2499.0)],
        };

        let invoice = render_invoice(&order, "Rs. 2499");
        assert!(invoice.contains("Rs.2499.00"));
        assert!(!invoice.contains('$'));
    }
}
